// Wed Jan 15 2026 - Alex

use crate::heap::{Builtin, Heap, ObjectId, TypeDescriptor, WellKnown};
use serde::{Deserialize, Serialize};

/// Catalog entries for runtime types with process-wide shared instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlyweightType {
    Enum,
    TypeObject,
    Boolean,
    Integer,
    Short,
    Byte,
    Long,
    BigInteger,
    BigDecimal,
    MathContext,
    Character,
    Locale,
    Logger,
    Proxy,
    CodingErrorAction,
    DatatypeField,
    QName,
    Misc,
}

impl FlyweightType {
    /// Catalog entry consulted for instances of `ty`.
    pub fn of(ty: &TypeDescriptor) -> Self {
        if ty.is_enum() {
            return Self::Enum;
        }
        match ty.builtin() {
            Some(Builtin::TypeObject) => Self::TypeObject,
            Some(Builtin::Boolean) => Self::Boolean,
            Some(Builtin::Integer) => Self::Integer,
            Some(Builtin::Short) => Self::Short,
            Some(Builtin::Byte) => Self::Byte,
            Some(Builtin::Long) => Self::Long,
            Some(Builtin::BigInteger) => Self::BigInteger,
            Some(Builtin::BigDecimal) => Self::BigDecimal,
            Some(Builtin::MathContext) => Self::MathContext,
            Some(Builtin::Character) => Self::Character,
            Some(Builtin::Locale) => Self::Locale,
            Some(Builtin::Logger) => Self::Logger,
            Some(Builtin::Proxy) => Self::Proxy,
            Some(Builtin::CodingErrorAction) => Self::CodingErrorAction,
            Some(Builtin::DatatypeField) => Self::DatatypeField,
            Some(Builtin::QName) => Self::QName,
            _ => Self::Misc,
        }
    }
}

/// Tunable part of the flyweight catalog.
///
/// Box caching ranges differ between hosts, so they are data rather than
/// constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlyweightCatalogConfig {
    pub small_value_min: i64,
    pub small_value_max: i64,
    pub char_cache_max: i64,
    pub disabled: Vec<FlyweightType>,
}

impl Default for FlyweightCatalogConfig {
    fn default() -> Self {
        Self {
            small_value_min: -128,
            small_value_max: 127,
            char_cache_max: 127,
            disabled: Vec::new(),
        }
    }
}

impl FlyweightCatalogConfig {
    pub fn with_small_values(mut self, min: i64, max: i64) -> Self {
        self.small_value_min = min;
        self.small_value_max = max;
        self
    }

    pub fn disable(mut self, entry: FlyweightType) -> Self {
        if !self.disabled.contains(&entry) {
            self.disabled.push(entry);
        }
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_value_min > self.small_value_max {
            return Err(format!(
                "small value range is empty: {}..={}",
                self.small_value_min, self.small_value_max
            ));
        }
        if self.char_cache_max < 0 {
            return Err("char_cache_max must not be negative".to_string());
        }
        Ok(())
    }
}

/// Recognizes canonical shared instances that a measurement must not count.
#[derive(Debug, Clone, Default)]
pub struct FlyweightClassifier {
    config: FlyweightCatalogConfig,
}

impl FlyweightClassifier {
    pub fn new(config: FlyweightCatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlyweightCatalogConfig {
        &self.config
    }

    pub fn is_shared(&self, heap: &Heap, obj: ObjectId) -> bool {
        let Ok(ty) = heap.type_of(obj) else {
            return false;
        };
        let entry = FlyweightType::of(ty);
        if self.config.disabled.contains(&entry) {
            return false;
        }
        let constant = heap.constant_of(obj);
        match entry {
            FlyweightType::Enum
            | FlyweightType::TypeObject
            | FlyweightType::CodingErrorAction
            | FlyweightType::DatatypeField => true,
            FlyweightType::Boolean => matches!(constant, Some(WellKnown::True | WellKnown::False)),
            FlyweightType::Integer => self.is_cached_box(heap, obj, Builtin::Integer, true),
            FlyweightType::Short => self.is_cached_box(heap, obj, Builtin::Short, true),
            FlyweightType::Long => self.is_cached_box(heap, obj, Builtin::Long, true),
            FlyweightType::Byte => self.is_cached_box(heap, obj, Builtin::Byte, false),
            FlyweightType::Character => heap
                .boxed_value(obj)
                .and_then(|v| v.as_i64())
                .is_some_and(|v| v <= self.config.char_cache_max)
                && self.is_cached_box(heap, obj, Builtin::Character, false),
            FlyweightType::BigInteger => matches!(
                constant,
                Some(WellKnown::BigIntegerZero | WellKnown::BigIntegerOne | WellKnown::BigIntegerTen)
            ),
            FlyweightType::BigDecimal => matches!(
                constant,
                Some(WellKnown::BigDecimalZero | WellKnown::BigDecimalOne | WellKnown::BigDecimalTen)
            ),
            FlyweightType::MathContext => matches!(
                constant,
                Some(
                    WellKnown::MathContextUnlimited
                        | WellKnown::MathContextDecimal32
                        | WellKnown::MathContextDecimal64
                        | WellKnown::MathContextDecimal128
                )
            ),
            FlyweightType::Locale => constant.is_some_and(|c| c.builtin() == Builtin::Locale),
            FlyweightType::Logger => constant == Some(WellKnown::GlobalLogger),
            FlyweightType::Proxy => constant == Some(WellKnown::NoProxy),
            FlyweightType::QName => constant.is_some_and(|c| c.builtin() == Builtin::QName),
            FlyweightType::Misc => matches!(
                constant,
                Some(
                    WellKnown::EmptyList
                        | WellKnown::EmptySet
                        | WellKnown::EmptyMap
                        | WellKnown::StdIn
                        | WellKnown::StdOut
                        | WellKnown::StdErr
                        | WellKnown::CaseInsensitiveOrder
                )
            ),
        }
    }

    fn is_cached_box(&self, heap: &Heap, obj: ObjectId, builtin: Builtin, ranged: bool) -> bool {
        let Some(value) = heap.boxed_value(obj).and_then(|v| v.as_i64()) else {
            return false;
        };
        if ranged && !(self.config.small_value_min..=self.config.small_value_max).contains(&value) {
            return false;
        }
        heap.cached_box(builtin, value) == Some(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{PrimitiveValue, TypeBuilder};

    #[test]
    fn test_small_boxes_are_shared_large_are_not() {
        let mut heap = Heap::new();
        let classifier = FlyweightClassifier::default();
        let small = heap.box_int(5).unwrap();
        let large = heap.box_int(5000).unwrap();
        let fresh_small = heap.new_boxed(PrimitiveValue::Int(5)).unwrap();

        assert!(classifier.is_shared(&heap, small));
        assert!(!classifier.is_shared(&heap, large));
        assert!(!classifier.is_shared(&heap, fresh_small));
    }

    #[test]
    fn test_narrower_range_from_config() {
        let mut heap = Heap::new();
        let classifier = FlyweightClassifier::new(FlyweightCatalogConfig::default().with_small_values(0, 10));
        let inside = heap.box_long(3).unwrap();
        let outside = heap.box_long(-3).unwrap();
        assert!(classifier.is_shared(&heap, inside));
        assert!(!classifier.is_shared(&heap, outside));
    }

    #[test]
    fn test_well_known_constants() {
        let mut heap = Heap::new();
        let classifier = FlyweightClassifier::default();
        for which in [
            WellKnown::True,
            WellKnown::BigDecimalTen,
            WellKnown::MathContextDecimal64,
            WellKnown::LocaleFrench,
            WellKnown::GlobalLogger,
            WellKnown::NoProxy,
            WellKnown::XmlDuration,
            WellKnown::EmptyMap,
            WellKnown::StdErr,
            WellKnown::CaseInsensitiveOrder,
        ] {
            let obj = heap.constant(which).unwrap();
            assert!(classifier.is_shared(&heap, obj), "{:?}", which);
        }

        let big = heap.builtin(Builtin::BigInteger).clone();
        let other = heap.new_instance(&big).unwrap();
        assert!(!classifier.is_shared(&heap, other));
    }

    #[test]
    fn test_every_datatype_name_constant_is_shared() {
        let mut heap = Heap::new();
        let classifier = FlyweightClassifier::default();
        for which in [
            WellKnown::XmlDateTime,
            WellKnown::XmlDate,
            WellKnown::XmlTime,
            WellKnown::XmlDuration,
            WellKnown::XmlGYearMonth,
            WellKnown::XmlGMonthDay,
            WellKnown::XmlGYear,
            WellKnown::XmlGMonth,
            WellKnown::XmlGDay,
            WellKnown::XmlDurationDayTime,
            WellKnown::XmlDurationYearMonth,
        ] {
            let obj = heap.constant(which).unwrap();
            assert_eq!(FlyweightType::of(heap.type_of(obj).unwrap()), FlyweightType::QName);
            assert!(classifier.is_shared(&heap, obj), "{:?}", which);
        }

        let qname = heap.builtin(Builtin::QName).clone();
        let custom = heap.new_instance(&qname).unwrap();
        assert!(!classifier.is_shared(&heap, custom));
    }

    #[test]
    fn test_enums_and_disabled_entries() {
        let mut heap = Heap::new();
        let color = TypeBuilder::class("Color").enum_type().build();
        let red = heap.new_instance(&color).unwrap();
        assert!(FlyweightClassifier::default().is_shared(&heap, red));

        let strict = FlyweightClassifier::new(FlyweightCatalogConfig::default().disable(FlyweightType::Enum));
        assert!(!strict.is_shared(&heap, red));
    }

    #[test]
    fn test_plain_objects_are_not_shared() {
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let obj = heap.new_instance(&object).unwrap();
        assert_eq!(FlyweightType::of(&object), FlyweightType::Misc);
        assert!(!FlyweightClassifier::default().is_shared(&heap, obj));
        assert!(FlyweightCatalogConfig::default().with_small_values(5, 1).validate().is_err());
    }
}
