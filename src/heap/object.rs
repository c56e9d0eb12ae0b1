// Tue Jan 13 2026 - Alex

use crate::heap::{FieldId, TypeRef};
use crate::model::PrimitiveKind;
use std::fmt;

/// Handle to an object in a [`crate::heap::Heap`]. Two handles are the same
/// object iff they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) u32);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{:x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(i8),
    Char(u16),
    Short(i16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
}

impl PrimitiveValue {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Short(_) => PrimitiveKind::Short,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Long(_) => PrimitiveKind::Long,
            Self::Double(_) => PrimitiveKind::Double,
        }
    }

    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Boolean => Self::Boolean(false),
            PrimitiveKind::Byte => Self::Byte(0),
            PrimitiveKind::Char => Self::Char(0),
            PrimitiveKind::Short => Self::Short(0),
            PrimitiveKind::Int => Self::Int(0),
            PrimitiveKind::Float => Self::Float(0.0),
            PrimitiveKind::Long => Self::Long(0),
            PrimitiveKind::Double => Self::Double(0.0),
        }
    }

    /// Integral value, for the integer and char kinds only.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(v as i64),
            Self::Char(v) => Some(v as i64),
            Self::Short(v) => Some(v as i64),
            Self::Int(v) => Some(v as i64),
            Self::Long(v) => Some(v),
            Self::Boolean(_) | Self::Float(_) | Self::Double(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Null,
    Ref(ObjectId),
    Primitive(PrimitiveValue),
}

impl Value {
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Ref(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Self::Ref(id)
    }
}

impl From<Option<ObjectId>> for Value {
    fn from(id: Option<ObjectId>) -> Self {
        id.map_or(Self::Null, Self::Ref)
    }
}

impl From<PrimitiveValue> for Value {
    fn from(value: PrimitiveValue) -> Self {
        Self::Primitive(value)
    }
}

#[derive(Debug, Clone)]
pub enum ObjectBody {
    Fields(Vec<(FieldId, Value)>),
    Array(Vec<Value>),
}

#[derive(Debug, Clone)]
pub struct HeapObject {
    pub(crate) ty: TypeRef,
    pub(crate) body: ObjectBody,
}

impl HeapObject {
    pub fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    pub fn body(&self) -> &ObjectBody {
        &self.body
    }
}
