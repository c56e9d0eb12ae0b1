// Wed Jan 15 2026 - Alex

use crate::filter::{FilterError, SizeOfFilter};
use crate::heap::{FieldRef, TypeRef, WeakTypeMap};
use crate::introspect::StructuralIntrospector;
use log::{debug, log_enabled, Level};
use std::sync::Arc;

/// Per type memo of filter decisions and of the fields the walker follows.
///
/// Entries vanish with their type. Racing threads may both compute an entry;
/// the results are identical so either write is kept.
pub struct FieldAndClassCache {
    filter: Arc<dyn SizeOfFilter>,
    introspector: StructuralIntrospector,
    fields: WeakTypeMap<Arc<[FieldRef]>>,
    classes: WeakTypeMap<bool>,
    verbose: bool,
}

impl FieldAndClassCache {
    pub fn new(filter: Arc<dyn SizeOfFilter>) -> Self {
        Self {
            filter,
            introspector: StructuralIntrospector::new(),
            fields: WeakTypeMap::new(),
            classes: WeakTypeMap::new(),
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn filter(&self) -> &Arc<dyn SizeOfFilter> {
        &self.filter
    }

    /// Whether instances of `ty` are walked and sized.
    pub fn should_walk(&self, ty: &TypeRef) -> Result<bool, FilterError> {
        self.classes
            .try_get_or_insert_with(ty, || self.filter.filter_class(ty))
    }

    /// Reference fields of `ty` that survive the filter.
    pub fn filtered_fields(&self, ty: &TypeRef) -> Result<Arc<[FieldRef]>, FilterError> {
        self.fields.try_get_or_insert_with(ty, || {
            let fields = self
                .filter
                .filter_fields(ty, self.introspector.reference_fields(ty))?;
            if self.verbose && log_enabled!(Level::Debug) {
                for field in fields.iter().filter(|f| f.is_transient()) {
                    debug!("Walking transient field '{}' of {}", field.name(), ty);
                }
            }
            Ok(fields.into())
        })
    }

    pub fn cached_types(&self) -> usize {
        self.fields.len().max(self.classes.len())
    }

    pub fn clear(&self) {
        self.fields.clear();
        self.classes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldExclusionFilter, PassThroughFilter};
    use crate::heap::{FieldKind, TypeBuilder};
    use crate::model::PrimitiveKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFilter(AtomicUsize);

    impl SizeOfFilter for CountingFilter {
        fn filter_class(&self, _ty: &TypeRef) -> Result<bool, FilterError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }

        fn filter_fields(&self, _ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(fields)
        }
    }

    #[test]
    fn test_decisions_are_computed_once_per_type() {
        let filter = Arc::new(CountingFilter(AtomicUsize::new(0)));
        let cache = FieldAndClassCache::new(filter.clone());
        let ty = TypeBuilder::class("Node").field("next", FieldKind::Reference).build();

        for _ in 0..3 {
            assert!(cache.should_walk(&ty).unwrap());
            assert_eq!(cache.filtered_fields(&ty).unwrap().len(), 1);
        }
        assert_eq!(filter.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_only_filtered_reference_fields() {
        let ty = TypeBuilder::class("Pair")
            .field("left", FieldKind::Reference)
            .field("right", FieldKind::Reference)
            .field("weight", PrimitiveKind::Double)
            .build();
        let fields = Arc::new(FieldExclusionFilter::new());
        fields.add_field(&ty.declared_fields()[1]).unwrap();

        let cache = FieldAndClassCache::new(fields);
        let kept = cache.filtered_fields(&ty).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "left");

        let open = FieldAndClassCache::new(Arc::new(PassThroughFilter));
        assert_eq!(open.filtered_fields(&ty).unwrap().len(), 2);
    }

    #[test]
    fn test_entries_released_with_type() {
        let cache = FieldAndClassCache::new(Arc::new(PassThroughFilter));
        let ty = TypeBuilder::class("Transient").build();
        cache.should_walk(&ty).unwrap();
        assert_eq!(cache.cached_types(), 1);
        drop(ty);
        assert_eq!(cache.cached_types(), 0);
    }
}
