// Tue Jan 13 2026 - Alex

use crate::heap::{Heap, ObjectId, WeakTypeMap};
use crate::sizer::{ObjectSizer, SizerError, SizerKind};

/// Remembers the size of each non-array type after its first instance.
///
/// Arrays always go to the wrapped sizer since their size depends on length.
pub struct CachingSizer {
    inner: Box<dyn ObjectSizer>,
    sizes: WeakTypeMap<u64>,
}

impl CachingSizer {
    pub fn new(inner: Box<dyn ObjectSizer>) -> Self {
        Self {
            inner,
            sizes: WeakTypeMap::new(),
        }
    }

    pub fn cached_types(&self) -> usize {
        self.sizes.len()
    }
}

impl ObjectSizer for CachingSizer {
    fn kind(&self) -> SizerKind {
        self.inner.kind()
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        let ty = heap.type_of(obj)?;
        if ty.is_array() {
            return self.inner.size_of(heap, obj);
        }
        self.sizes
            .try_get_or_insert_with(ty, || self.inner.size_of(heap, obj))
    }
}
