// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
}

/// Size classes used when packing the fields of one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    Eight,
    Four,
    Two,
    One,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Long,
        Self::Double,
    ];

    pub fn size(self) -> u64 {
        match self {
            Self::Boolean | Self::Byte => 1,
            Self::Char | Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    pub fn size_class(self) -> SizeClass {
        match self.size() {
            8 => SizeClass::Eight,
            4 => SizeClass::Four,
            2 => SizeClass::Two,
            _ => SizeClass::One,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    pub fn is_integer(self) -> bool {
        !self.is_float() && self != Self::Boolean
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Boolean => 0,
            Self::Byte => 1,
            Self::Char => 2,
            Self::Short => 3,
            Self::Int => 4,
            Self::Float => 5,
            Self::Long => 6,
            Self::Double => 7,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Long => "long",
            Self::Double => "double",
        };
        f.write_str(name)
    }
}
