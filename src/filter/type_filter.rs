// Tue Jan 13 2026 - Alex

use crate::filter::{FilterError, SizeOfFilter};
use crate::heap::{FieldRef, TypeRef, WeakTypeMap};

/// Excludes instances of registered types.
///
/// A strict registration excludes exactly that type. A non-strict one also
/// excludes every subtype; subtypes found that way are remembered so the
/// hierarchy scan runs once per type.
#[derive(Default)]
pub struct TypeExclusionFilter {
    ignored: WeakTypeMap<()>,
    with_subtypes: WeakTypeMap<()>,
}

impl TypeExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&self, ty: &TypeRef, strict: bool) {
        if strict {
            self.ignored.insert(ty, ());
        } else if !self.with_subtypes.contains(ty) {
            self.with_subtypes.insert(ty, ());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty() && self.with_subtypes.is_empty()
    }
}

impl SizeOfFilter for TypeExclusionFilter {
    fn filter_class(&self, ty: &TypeRef) -> Result<bool, FilterError> {
        if self.ignored.contains(ty) {
            return Ok(false);
        }
        let excluded = ty
            .ancestors()
            .any(|ancestor| self.with_subtypes.get_by_key(ancestor.key()).is_some());
        if excluded {
            self.ignored.insert(ty, ());
        }
        Ok(!excluded)
    }

    fn filter_fields(&self, _ty: &TypeRef, fields: Vec<FieldRef>) -> Result<Vec<FieldRef>, FilterError> {
        Ok(fields)
    }
}
