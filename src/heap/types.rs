// Tue Jan 13 2026 - Alex

use crate::heap::{FieldKind, FieldRef};
use bitflags::bitflags;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type TypeRef = Arc<TypeDescriptor>;
pub type PackageRef = Arc<PackageDescriptor>;

static NEXT_TYPE_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identity token of a type. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(u64);

impl TypeKey {
    pub(crate) fn next() -> Self {
        Self(NEXT_TYPE_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        const FINAL = 1 << 0;
        const ENUM = 1 << 1;
        /// Instances describe types of the host itself.
        const TYPE_OBJECT = 1 << 2;
    }
}

/// A declarative exclusion marker attached to a type, field or package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Marker {
    pub name: String,
    pub inherited: bool,
}

impl Marker {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inherited: false,
        }
    }

    pub fn inherited(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inherited: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl PackageDescriptor {
    pub fn new(name: &str) -> PackageRef {
        Arc::new(Self {
            name: name.to_string(),
            markers: Vec::new(),
        })
    }

    pub fn with_markers(name: &str, markers: Vec<Marker>) -> PackageRef {
        Arc::new(Self {
            name: name.to_string(),
            markers,
        })
    }
}

/// Library types every heap provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Object,
    TypeObject,
    Boolean,
    Byte,
    Short,
    Character,
    Integer,
    Long,
    Float,
    Double,
    String,
    BigInteger,
    BigDecimal,
    MathContext,
    Locale,
    Logger,
    Proxy,
    CodingErrorAction,
    DatatypeField,
    QName,
    EmptyList,
    EmptySet,
    EmptyMap,
    InputStream,
    PrintStream,
    Comparator,
}

#[derive(Debug)]
pub enum TypeShape {
    Instance { fields: Vec<FieldRef> },
    Array { element: FieldKind },
}

#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) key: TypeKey,
    pub(crate) name: String,
    pub(crate) package: Option<PackageRef>,
    pub(crate) superclass: Option<TypeRef>,
    pub(crate) shape: TypeShape,
    pub(crate) flags: TypeFlags,
    pub(crate) markers: Vec<Marker>,
    pub(crate) builtin: Option<Builtin>,
}

impl TypeDescriptor {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> Option<&PackageRef> {
        self.package.as_ref()
    }

    pub fn superclass(&self) -> Option<&TypeRef> {
        self.superclass.as_ref()
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn builtin(&self) -> Option<Builtin> {
        self.builtin
    }

    pub fn is_final(&self) -> bool {
        self.flags.contains(TypeFlags::FINAL)
    }

    /// True for enum types and for the per-constant subclasses of an enum.
    pub fn is_enum(&self) -> bool {
        self.flags.contains(TypeFlags::ENUM)
            || self
                .superclass
                .as_ref()
                .is_some_and(|s| s.flags.contains(TypeFlags::ENUM))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array { .. })
    }

    pub fn element_kind(&self) -> Option<FieldKind> {
        match self.shape {
            TypeShape::Array { element } => Some(element),
            TypeShape::Instance { .. } => None,
        }
    }

    /// Fields declared directly on this type, statics included.
    pub fn declared_fields(&self) -> &[FieldRef] {
        match &self.shape {
            TypeShape::Instance { fields } => fields.as_slice(),
            TypeShape::Array { .. } => &[],
        }
    }

    /// This type followed by its superclasses, most derived first.
    pub fn ancestors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |t| t.superclass.as_deref())
    }

    pub fn is_assignable_from(&self, other: &TypeDescriptor) -> bool {
        other.ancestors().any(|t| t.key == self.key)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}.{}", package.name, self.name),
            None => f.write_str(&self.name),
        }
    }
}
