// Tue Jan 13 2026 - Alex

use crate::heap::{Marker, TypeDescriptor, TypeKey, TypeRef};
use crate::model::{PrimitiveKind, RuntimeMemoryModel};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

pub type FieldRef = Arc<FieldDescriptor>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Reference,
    Primitive(PrimitiveKind),
}

impl FieldKind {
    pub fn is_reference(self) -> bool {
        matches!(self, Self::Reference)
    }

    pub fn size(self, model: &RuntimeMemoryModel) -> u64 {
        match self {
            Self::Reference => model.reference_width(),
            Self::Primitive(kind) => model.primitive_size(kind),
        }
    }
}

impl From<PrimitiveKind> for FieldKind {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("ref"),
            Self::Primitive(kind) => write!(f, "{}", kind),
        }
    }
}

/// Identity of a field: its declaring type plus its declaration slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub owner: TypeKey,
    pub slot: u16,
}

#[derive(Debug)]
pub struct FieldDescriptor {
    pub(crate) id: FieldId,
    pub(crate) owner: Weak<TypeDescriptor>,
    pub(crate) owner_name: String,
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) is_static: bool,
    pub(crate) is_transient: bool,
    pub(crate) accessible: bool,
    pub(crate) markers: Vec<Marker>,
}

impl FieldDescriptor {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_transient(&self) -> bool {
        self.is_transient
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn declaring_key(&self) -> TypeKey {
        self.id.owner
    }

    /// `None` once the declaring type has been dropped.
    pub fn declaring_type(&self) -> Option<TypeRef> {
        self.owner.upgrade()
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FieldDescriptor {}

impl Hash for FieldDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner_name, self.name, self.kind)
    }
}

/// Declaration of a field handed to [`crate::heap::TypeBuilder`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    is_static: bool,
    is_transient: bool,
    accessible: bool,
    markers: Vec<Marker>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: impl Into<FieldKind>) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.into(),
            is_static: false,
            is_transient: false,
            accessible: true,
            markers: Vec::new(),
        }
    }

    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.is_transient = true;
        self
    }

    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub(crate) fn into_descriptor(
        self,
        owner: Weak<TypeDescriptor>,
        owner_key: TypeKey,
        owner_name: &str,
        slot: u16,
    ) -> FieldDescriptor {
        FieldDescriptor {
            id: FieldId { owner: owner_key, slot },
            owner,
            owner_name: owner_name.to_string(),
            name: self.name,
            kind: self.kind,
            is_static: self.is_static,
            is_transient: self.is_transient,
            accessible: self.accessible,
            markers: self.markers,
        }
    }
}
