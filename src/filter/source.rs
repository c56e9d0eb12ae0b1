// Wed Jan 15 2026 - Alex

use crate::filter::{
    CombinationFilter, DeclarativeExclusionFilter, FieldExclusionFilter, FilterError, SizeOfFilter,
    TypeExclusionFilter,
};
use crate::heap::{FieldRef, TypeRef};
use log::info;
use std::sync::Arc;

/// Extension hook that registers exclusions on a [`FilterSource`].
pub trait FilterConfigurator: Send + Sync {
    fn configure(&self, source: &FilterSource) -> Result<(), FilterError>;
}

/// Registry of exclusions an integration layer feeds at runtime.
///
/// Registration goes through `&self`, so a source can be shared with the
/// engines it produced. Engines cache decisions per type, so a late
/// exclusion only affects types an engine has not met yet.
pub struct FilterSource {
    types: Arc<TypeExclusionFilter>,
    fields: Arc<FieldExclusionFilter>,
    declarative: Option<Arc<DeclarativeExclusionFilter>>,
}

impl FilterSource {
    pub fn new(register_declarative: bool) -> Self {
        Self {
            types: Arc::new(TypeExclusionFilter::new()),
            fields: Arc::new(FieldExclusionFilter::new()),
            declarative: register_declarative.then(|| Arc::new(DeclarativeExclusionFilter::default())),
        }
    }

    /// Declarative filtering with a custom marker pattern.
    pub fn with_marker_pattern(pattern: &str) -> Result<Self, FilterError> {
        let declarative = DeclarativeExclusionFilter::with_pattern(pattern)?;
        info!("Using marker pattern {} for declarative exclusions", pattern);
        Ok(Self {
            declarative: Some(Arc::new(declarative)),
            ..Self::new(false)
        })
    }

    /// Final types have no subtypes, so they are always registered strictly.
    pub fn ignore_instances_of(&self, ty: &TypeRef, strict: bool) {
        self.types.add_type(ty, strict || ty.is_final());
    }

    pub fn ignore_field(&self, field: &FieldRef) -> Result<(), FilterError> {
        self.fields.add_field(field)?;
        Ok(())
    }

    pub fn apply(&self, configurator: &dyn FilterConfigurator) -> Result<(), FilterError> {
        configurator.configure(self)
    }

    pub fn filters(&self) -> Vec<Arc<dyn SizeOfFilter>> {
        let mut filters: Vec<Arc<dyn SizeOfFilter>> = vec![self.types.clone(), self.fields.clone()];
        if let Some(declarative) = &self.declarative {
            filters.push(declarative.clone());
        }
        filters
    }

    pub fn combined(&self) -> CombinationFilter {
        CombinationFilter::new(self.filters())
    }

    pub fn has_declarative(&self) -> bool {
        self.declarative.is_some()
    }
}

impl Default for FilterSource {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldKind, TypeBuilder};

    struct IgnoreType(TypeRef);

    impl FilterConfigurator for IgnoreType {
        fn configure(&self, source: &FilterSource) -> Result<(), FilterError> {
            source.ignore_instances_of(&self.0, true);
            Ok(())
        }
    }

    #[test]
    fn test_declarative_filter_is_optional() {
        assert_eq!(FilterSource::new(true).filters().len(), 3);
        assert_eq!(FilterSource::new(false).filters().len(), 2);
        assert!(FilterSource::with_marker_pattern("^x$").unwrap().has_declarative());
        assert!(FilterSource::with_marker_pattern("[").is_err());
    }

    #[test]
    fn test_configurator_registers_exclusions() {
        let source = FilterSource::new(false);
        let hidden = TypeBuilder::class("Hidden").build();
        let shown = TypeBuilder::class("Shown").build();
        source.apply(&IgnoreType(hidden.clone())).unwrap();

        let combined = source.combined();
        assert!(!combined.filter_class(&hidden).unwrap());
        assert!(combined.filter_class(&shown).unwrap());
    }

    #[test]
    fn test_final_types_are_registered_strictly() {
        let source = FilterSource::new(false);
        let sealed = TypeBuilder::class("Sealed").final_type().build();
        source.ignore_instances_of(&sealed, false);
        assert!(!source.combined().filter_class(&sealed).unwrap());

        let node = TypeBuilder::class("Node").field("next", FieldKind::Reference).build();
        source.ignore_field(&node.declared_fields()[0]).unwrap();
        let kept = source
            .combined()
            .filter_fields(&node, node.declared_fields().to_vec())
            .unwrap();
        assert!(kept.is_empty());
    }
}
