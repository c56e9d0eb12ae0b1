// Tue Jan 13 2026 - Alex

use crate::filter::{FilterError, SizeOfFilter};
use crate::heap::{FieldRef, TypeRef};
use std::sync::Arc;

/// Logical AND of its members, applied in order.
pub struct CombinationFilter {
    filters: Vec<Arc<dyn SizeOfFilter>>,
}

impl CombinationFilter {
    pub fn new(filters: Vec<Arc<dyn SizeOfFilter>>) -> Self {
        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl SizeOfFilter for CombinationFilter {
    fn filter_class(&self, ty: &TypeRef) -> Result<bool, FilterError> {
        for filter in &self.filters {
            if !filter.filter_class(ty)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn filter_fields(&self, ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
        let mut remaining = fields;
        for filter in &self.filters {
            if remaining.is_empty() {
                break;
            }
            remaining = filter.filter_fields(ty, remaining)?;
        }
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldExclusionFilter, PassThroughFilter, TypeExclusionFilter};
    use crate::heap::{FieldKind, TypeBuilder};

    #[test]
    fn test_class_rejected_by_any_member() {
        let types = Arc::new(TypeExclusionFilter::new());
        let rejected = TypeBuilder::class("Rejected").build();
        let allowed = TypeBuilder::class("Allowed").build();
        types.add_type(&rejected, true);

        let members: Vec<Arc<dyn SizeOfFilter>> = vec![Arc::new(PassThroughFilter), types];
        let combined = CombinationFilter::new(members);
        assert!(!combined.filter_class(&rejected).unwrap());
        assert!(combined.filter_class(&allowed).unwrap());
    }

    #[test]
    fn test_field_removals_accumulate() {
        let ty = TypeBuilder::class("Node")
            .field("a", FieldKind::Reference)
            .field("b", FieldKind::Reference)
            .field("c", FieldKind::Reference)
            .build();
        let first = Arc::new(FieldExclusionFilter::new());
        first.add_field(&ty.declared_fields()[0]).unwrap();
        let second = Arc::new(FieldExclusionFilter::new());
        second.add_field(&ty.declared_fields()[2]).unwrap();

        let members: Vec<Arc<dyn SizeOfFilter>> = vec![first, second];
        let combined = CombinationFilter::new(members);
        let kept = combined
            .filter_fields(&ty, ty.declared_fields().to_vec())
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "b");
    }
}
