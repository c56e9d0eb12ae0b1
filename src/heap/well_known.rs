// Wed Jan 15 2026 - Alex

use crate::heap::{Builtin, FieldKind, FieldSpec, PackageDescriptor, TypeBuilder, TypeFlags, TypeRef};
use crate::model::PrimitiveKind;

/// Process-wide singleton instances every heap can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnown {
    True,
    False,
    BigIntegerZero,
    BigIntegerOne,
    BigIntegerTen,
    BigDecimalZero,
    BigDecimalOne,
    BigDecimalTen,
    MathContextUnlimited,
    MathContextDecimal32,
    MathContextDecimal64,
    MathContextDecimal128,
    LocaleRoot,
    LocaleEnglish,
    LocaleUs,
    LocaleUk,
    LocaleFrench,
    LocaleGerman,
    GlobalLogger,
    NoProxy,
    XmlDateTime,
    XmlDate,
    XmlTime,
    XmlDuration,
    XmlGYearMonth,
    XmlGMonthDay,
    XmlGYear,
    XmlGMonth,
    XmlGDay,
    XmlDurationDayTime,
    XmlDurationYearMonth,
    EmptyList,
    EmptySet,
    EmptyMap,
    StdIn,
    StdOut,
    StdErr,
    CaseInsensitiveOrder,
}

impl WellKnown {
    pub fn builtin(self) -> Builtin {
        use WellKnown::*;
        match self {
            True | False => Builtin::Boolean,
            BigIntegerZero | BigIntegerOne | BigIntegerTen => Builtin::BigInteger,
            BigDecimalZero | BigDecimalOne | BigDecimalTen => Builtin::BigDecimal,
            MathContextUnlimited | MathContextDecimal32 | MathContextDecimal64 | MathContextDecimal128 => {
                Builtin::MathContext
            }
            LocaleRoot | LocaleEnglish | LocaleUs | LocaleUk | LocaleFrench | LocaleGerman => Builtin::Locale,
            GlobalLogger => Builtin::Logger,
            NoProxy => Builtin::Proxy,
            XmlDateTime | XmlDate | XmlTime | XmlDuration | XmlGYearMonth | XmlGMonthDay | XmlGYear | XmlGMonth
            | XmlGDay | XmlDurationDayTime | XmlDurationYearMonth => Builtin::QName,
            EmptyList => Builtin::EmptyList,
            EmptySet => Builtin::EmptySet,
            EmptyMap => Builtin::EmptyMap,
            StdIn => Builtin::InputStream,
            StdOut | StdErr => Builtin::PrintStream,
            CaseInsensitiveOrder => Builtin::Comparator,
        }
    }

    /// Primitive field values the singleton is created with.
    pub(crate) fn initial_primitive(self) -> Option<(&'static str, crate::heap::PrimitiveValue)> {
        use crate::heap::PrimitiveValue::*;
        use WellKnown::*;
        match self {
            True => Some(("value", Boolean(true))),
            False => Some(("value", Boolean(false))),
            BigIntegerOne | BigIntegerTen => Some(("signum", Int(1))),
            BigDecimalOne => Some(("compact", Long(1))),
            BigDecimalTen => Some(("compact", Long(10))),
            MathContextDecimal32 => Some(("precision", Int(7))),
            MathContextDecimal64 => Some(("precision", Int(16))),
            MathContextDecimal128 => Some(("precision", Int(34))),
            StdIn => Some(("fd", Int(0))),
            StdOut => Some(("fd", Int(1))),
            StdErr => Some(("fd", Int(2))),
            _ => None,
        }
    }
}

impl Builtin {
    pub const ALL: [Builtin; 26] = [
        Builtin::Object,
        Builtin::TypeObject,
        Builtin::Boolean,
        Builtin::Byte,
        Builtin::Short,
        Builtin::Character,
        Builtin::Integer,
        Builtin::Long,
        Builtin::Float,
        Builtin::Double,
        Builtin::String,
        Builtin::BigInteger,
        Builtin::BigDecimal,
        Builtin::MathContext,
        Builtin::Locale,
        Builtin::Logger,
        Builtin::Proxy,
        Builtin::CodingErrorAction,
        Builtin::DatatypeField,
        Builtin::QName,
        Builtin::EmptyList,
        Builtin::EmptySet,
        Builtin::EmptyMap,
        Builtin::InputStream,
        Builtin::PrintStream,
        Builtin::Comparator,
    ];

    /// Primitive kind of the `value` field for the boxed types.
    pub fn boxed_kind(self) -> Option<PrimitiveKind> {
        match self {
            Self::Boolean => Some(PrimitiveKind::Boolean),
            Self::Byte => Some(PrimitiveKind::Byte),
            Self::Short => Some(PrimitiveKind::Short),
            Self::Character => Some(PrimitiveKind::Char),
            Self::Integer => Some(PrimitiveKind::Int),
            Self::Long => Some(PrimitiveKind::Long),
            Self::Float => Some(PrimitiveKind::Float),
            Self::Double => Some(PrimitiveKind::Double),
            _ => None,
        }
    }

    pub fn for_boxed_kind(kind: PrimitiveKind) -> Builtin {
        match kind {
            PrimitiveKind::Boolean => Self::Boolean,
            PrimitiveKind::Byte => Self::Byte,
            PrimitiveKind::Short => Self::Short,
            PrimitiveKind::Char => Self::Character,
            PrimitiveKind::Int => Self::Integer,
            PrimitiveKind::Long => Self::Long,
            PrimitiveKind::Float => Self::Float,
            PrimitiveKind::Double => Self::Double,
        }
    }
}

/// Types of the runtime library, one per [`Builtin`].
#[derive(Debug, Clone)]
pub struct BuiltinTypes {
    types: Vec<TypeRef>,
    char_array: TypeRef,
}

impl BuiltinTypes {
    pub fn new() -> Self {
        let lang = PackageDescriptor::new("lang");
        let object = TypeBuilder::class("Object")
            .package(&lang)
            .builtin(Builtin::Object)
            .build();

        let types = Builtin::ALL
            .iter()
            .map(|&builtin| match builtin {
                Builtin::Object => object.clone(),
                other => Self::define(other, &object),
            })
            .collect();

        let char_array = TypeBuilder::array("char[]", PrimitiveKind::Char)
            .extends(&object)
            .build();

        Self { types, char_array }
    }

    pub fn get(&self, builtin: Builtin) -> &TypeRef {
        &self.types[builtin as usize]
    }

    pub fn char_array(&self) -> &TypeRef {
        &self.char_array
    }

    fn define(builtin: Builtin, object: &TypeRef) -> TypeRef {
        let (package, name) = match builtin {
            Builtin::Object => ("lang", "Object"),
            Builtin::TypeObject => ("lang", "Type"),
            Builtin::Boolean => ("lang", "Boolean"),
            Builtin::Byte => ("lang", "Byte"),
            Builtin::Short => ("lang", "Short"),
            Builtin::Character => ("lang", "Character"),
            Builtin::Integer => ("lang", "Integer"),
            Builtin::Long => ("lang", "Long"),
            Builtin::Float => ("lang", "Float"),
            Builtin::Double => ("lang", "Double"),
            Builtin::String => ("lang", "String"),
            Builtin::BigInteger => ("math", "BigInteger"),
            Builtin::BigDecimal => ("math", "BigDecimal"),
            Builtin::MathContext => ("math", "MathContext"),
            Builtin::Locale => ("util", "Locale"),
            Builtin::Logger => ("logging", "Logger"),
            Builtin::Proxy => ("net", "Proxy"),
            Builtin::CodingErrorAction => ("charset", "CodingErrorAction"),
            Builtin::DatatypeField => ("xml", "DatatypeConstants$Field"),
            Builtin::QName => ("xml", "QName"),
            Builtin::EmptyList => ("util", "Collections$EmptyList"),
            Builtin::EmptySet => ("util", "Collections$EmptySet"),
            Builtin::EmptyMap => ("util", "Collections$EmptyMap"),
            Builtin::InputStream => ("io", "FileInputStream"),
            Builtin::PrintStream => ("io", "PrintStream"),
            Builtin::Comparator => ("lang", "String$CaseInsensitiveComparator"),
        };

        let mut builder = TypeBuilder::class(name)
            .package(&PackageDescriptor::new(package))
            .extends(object)
            .builtin(builtin);

        if let Some(kind) = builtin.boxed_kind() {
            return builder.field("value", kind).final_type().build();
        }

        let reference = FieldKind::Reference;
        builder = match builtin {
            Builtin::TypeObject => builder
                .field("name", reference)
                .flags(TypeFlags::FINAL | TypeFlags::TYPE_OBJECT),
            Builtin::String => builder
                .field("value", reference)
                .field("hash", PrimitiveKind::Int)
                .final_type(),
            Builtin::BigInteger => builder
                .field("signum", PrimitiveKind::Int)
                .field("mag", reference),
            Builtin::BigDecimal => builder
                .field("int_val", reference)
                .field("scale", PrimitiveKind::Int)
                .field("precision", PrimitiveKind::Int)
                .field("compact", PrimitiveKind::Long),
            Builtin::MathContext => builder
                .field("precision", PrimitiveKind::Int)
                .field("rounding_mode", reference)
                .final_type(),
            Builtin::Locale => builder
                .field("base_locale", reference)
                .field("extensions", reference)
                .field_spec(FieldSpec::new("hash_code_value", PrimitiveKind::Int).transient())
                .final_type(),
            Builtin::Logger => builder
                .field("name", reference)
                .field("level", reference)
                .field("parent", reference),
            Builtin::Proxy => builder.field("kind", reference).field("address", reference),
            Builtin::CodingErrorAction => builder.field("name", reference),
            Builtin::DatatypeField => builder
                .field("name", reference)
                .field("id", PrimitiveKind::Int),
            Builtin::QName => builder
                .field("namespace_uri", reference)
                .field("local_part", reference)
                .field("prefix", reference),
            Builtin::InputStream => builder.field("fd", PrimitiveKind::Int),
            Builtin::PrintStream => builder
                .field("fd", PrimitiveKind::Int)
                .field("out", reference)
                .field("auto_flush", PrimitiveKind::Boolean),
            _ => builder,
        };
        builder.build()
    }
}

impl Default for BuiltinTypes {
    fn default() -> Self {
        Self::new()
    }
}
