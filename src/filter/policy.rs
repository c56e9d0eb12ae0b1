// Tue Jan 13 2026 - Alex

use crate::filter::FilterError;
use crate::heap::{FieldRef, TypeRef};

/// Decides which parts of an object graph get walked and measured.
///
/// Decisions must depend only on the type and field handed in, since callers
/// cache them per type.
pub trait SizeOfFilter: Send + Sync {
    /// `false` excludes every instance of `ty` from sizing and traversal.
    fn filter_class(&self, ty: &TypeRef) -> Result<bool, FilterError>;

    /// Returns the subset of `fields` (declared somewhere in `ty`'s hierarchy) to follow.
    fn filter_fields(&self, ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughFilter;

impl SizeOfFilter for PassThroughFilter {
    fn filter_class(&self, _ty: &TypeRef) -> Result<bool, FilterError> {
        Ok(true)
    }

    fn filter_fields(&self, _ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
        Ok(fields)
    }
}
