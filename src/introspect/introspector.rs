// Tue Jan 13 2026 - Alex

use crate::heap::{FieldKind, FieldRef, TypeDescriptor, TypeKey, TypeRef, WeakTypeMap};
use crate::model::SizeClass;
use log::error;
use std::sync::Arc;

/// Non-static field counts of one class in a hierarchy, grouped by storage width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassFieldCounts {
    pub key: Option<TypeKey>,
    pub longs: u64,
    pub ints: u64,
    pub shorts: u64,
    pub bytes: u64,
    pub references: u64,
}

impl ClassFieldCounts {
    pub fn of(class: &TypeDescriptor) -> Self {
        let mut counts = Self {
            key: Some(class.key()),
            ..Self::default()
        };
        for field in class.declared_fields().iter().filter(|f| !f.is_static()) {
            match field.kind() {
                FieldKind::Reference => counts.references += 1,
                FieldKind::Primitive(kind) => match kind.size_class() {
                    SizeClass::Eight => counts.longs += 1,
                    SizeClass::Four => counts.ints += 1,
                    SizeClass::Two => counts.shorts += 1,
                    SizeClass::One => counts.bytes += 1,
                },
            }
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.longs + self.ints + self.shorts + self.bytes + self.references
    }
}

/// Enumerates the structure of types without touching any instance.
#[derive(Default)]
pub struct StructuralIntrospector {
    layouts: WeakTypeMap<Arc<[ClassFieldCounts]>>,
}

impl StructuralIntrospector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element kind when `ty` is an array type.
    pub fn array_info(&self, ty: &TypeRef) -> Option<FieldKind> {
        ty.element_kind()
    }

    /// Non-static fields of the whole hierarchy, most derived class first.
    pub fn instance_fields(&self, ty: &TypeRef) -> Vec<FieldRef> {
        ty.ancestors()
            .flat_map(|class| class.declared_fields().iter())
            .filter(|field| !field.is_static())
            .cloned()
            .collect()
    }

    /// Reference fields the walker can follow.
    ///
    /// Fields the host refuses to expose are dropped with an error, so the
    /// subgraph beneath them is not counted.
    pub fn reference_fields(&self, ty: &TypeRef) -> Vec<FieldRef> {
        let mut fields = Vec::new();
        for field in self.instance_fields(ty) {
            if !field.kind().is_reference() {
                continue;
            }
            if !field.is_accessible() {
                error!(
                    "Access to {} is denied, the subgraph beneath it will not be sized and {} may be underestimated",
                    field, ty
                );
                continue;
            }
            fields.push(field);
        }
        fields
    }

    /// Per class field counts, base class first.
    pub fn field_counts(&self, ty: &TypeRef) -> Arc<[ClassFieldCounts]> {
        self.layouts.get_or_insert_with(ty, || {
            let mut counts: Vec<_> = ty.ancestors().map(ClassFieldCounts::of).collect();
            counts.reverse();
            counts.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldSpec, TypeBuilder};
    use crate::model::PrimitiveKind;

    fn hierarchy() -> (TypeRef, TypeRef) {
        let base = TypeBuilder::class("Base")
            .field("id", PrimitiveKind::Long)
            .field_spec(FieldSpec::new("COUNT", PrimitiveKind::Int).static_field())
            .field("owner", FieldKind::Reference)
            .build();
        let derived = TypeBuilder::class("Derived")
            .extends(&base)
            .field("flag", PrimitiveKind::Boolean)
            .field_spec(FieldSpec::new("secret", FieldKind::Reference).inaccessible())
            .field("next", FieldKind::Reference)
            .build();
        (base, derived)
    }

    #[test]
    fn test_instance_fields_skip_statics() {
        let (_base, derived) = hierarchy();
        let introspector = StructuralIntrospector::new();
        let names: Vec<_> = introspector
            .instance_fields(&derived)
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, ["flag", "secret", "next", "id", "owner"]);
    }

    #[test]
    fn test_reference_fields_drop_inaccessible() {
        let (_base, derived) = hierarchy();
        let introspector = StructuralIntrospector::new();
        let names: Vec<_> = introspector
            .reference_fields(&derived)
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, ["next", "owner"]);
    }

    #[test]
    fn test_field_counts_base_first() {
        let (base, derived) = hierarchy();
        let introspector = StructuralIntrospector::new();
        let counts = introspector.field_counts(&derived);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].key, Some(base.key()));
        assert_eq!((counts[0].longs, counts[0].references, counts[0].ints), (1, 1, 0));
        assert_eq!((counts[1].bytes, counts[1].references), (1, 2));
        assert_eq!(counts[1].total(), 3);
    }
}
