// Tue Jan 13 2026 - Alex

use crate::filter::{FilterError, SizeOfFilter};
use crate::heap::{FieldId, FieldRef, HeapError, TypeRef, WeakTypeMap};
use ahash::AHashSet;
use log::debug;

/// Drops individual fields, registered under the type that declares them.
///
/// Exclusions are looked up by the runtime type of the instance being walked:
/// `Base.next` is dropped from `Base` instances only, a `Derived` instance
/// still follows its inherited `next`.
#[derive(Default)]
pub struct FieldExclusionFilter {
    ignored: WeakTypeMap<AHashSet<FieldId>>,
}

impl FieldExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&self, field: &FieldRef) -> Result<(), HeapError> {
        let owner = field
            .declaring_type()
            .ok_or_else(|| HeapError::TypeUnloaded(field.to_string()))?;
        self.ignored.update(&owner, |fields| {
            fields.insert(field.id());
        });
        Ok(())
    }

    /// Whether `field` is excluded when walking an instance of exactly `ty`.
    pub fn is_ignored(&self, ty: &TypeRef, field: &FieldRef) -> bool {
        self.ignored
            .with_value(ty.key(), |fields| fields.contains(&field.id()))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty()
    }
}

impl SizeOfFilter for FieldExclusionFilter {
    fn filter_class(&self, _ty: &TypeRef) -> Result<bool, FilterError> {
        Ok(true)
    }

    fn filter_fields(&self, ty: &TypeRef, mut fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
        let removed = self.ignored.with_value(ty.key(), |ignored| {
            let before = fields.len();
            fields.retain(|field| !ignored.contains(&field.id()));
            before - fields.len()
        });
        if let Some(removed) = removed.filter(|&n| n > 0) {
            debug!("Dropped {} excluded field(s) of {}", removed, ty);
        }
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldKind, TypeBuilder};

    fn all_fields(ty: &TypeRef) -> Vec<FieldRef> {
        ty.ancestors()
            .flat_map(|t| t.declared_fields().iter().cloned())
            .collect()
    }

    fn names(fields: &[FieldRef]) -> Vec<String> {
        fields.iter().map(|f| f.name().to_string()).collect()
    }

    #[test]
    fn test_removes_field_from_declaring_type_instances() {
        let base = TypeBuilder::class("Base")
            .field("next", FieldKind::Reference)
            .field("data", FieldKind::Reference)
            .build();
        let filter = FieldExclusionFilter::new();
        assert!(filter.is_empty());
        filter.add_field(&base.declared_fields()[0]).unwrap();
        assert!(!filter.is_empty());

        let kept = filter.filter_fields(&base, all_fields(&base)).unwrap();
        assert_eq!(names(&kept), vec!["data"]);
        assert!(filter.is_ignored(&base, &base.declared_fields()[0]));
    }

    #[test]
    fn test_subtype_instances_keep_inherited_field() {
        let base = TypeBuilder::class("Base")
            .field("next", FieldKind::Reference)
            .field("data", FieldKind::Reference)
            .build();
        let derived = TypeBuilder::class("Derived")
            .extends(&base)
            .field("next", FieldKind::Reference)
            .build();

        let filter = FieldExclusionFilter::new();
        filter.add_field(&base.declared_fields()[0]).unwrap();

        let kept = filter.filter_fields(&derived, all_fields(&derived)).unwrap();
        assert_eq!(names(&kept), vec!["next", "next", "data"]);
        assert!(!filter.is_ignored(&derived, &base.declared_fields()[0]));
    }

    #[test]
    fn test_subtype_field_registered_on_subtype() {
        let base = TypeBuilder::class("Base").field("next", FieldKind::Reference).build();
        let derived = TypeBuilder::class("Derived")
            .extends(&base)
            .field("extra", FieldKind::Reference)
            .build();

        let filter = FieldExclusionFilter::new();
        filter.add_field(&derived.declared_fields()[0]).unwrap();

        let kept = filter.filter_fields(&derived, all_fields(&derived)).unwrap();
        assert_eq!(names(&kept), vec!["next"]);
        assert_eq!(filter.filter_fields(&base, all_fields(&base)).unwrap().len(), 1);
    }
}
