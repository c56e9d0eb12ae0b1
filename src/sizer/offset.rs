// Tue Jan 13 2026 - Alex

use crate::heap::{FieldOffsets, Heap, HostFacilities, ObjectId};
use crate::model::RuntimeMemoryModel;
use crate::sizer::{ObjectSizer, SizerError, SizerKind};
use std::sync::Arc;

/// Derives object sizes from field storage offsets.
///
/// An instance ends one byte past its last field. Only the most derived class
/// declaring instance fields is consulted, since its fields sit last.
pub struct OffsetSizer {
    model: RuntimeMemoryModel,
    offsets: Arc<dyn FieldOffsets>,
}

impl OffsetSizer {
    pub fn new(model: RuntimeMemoryModel, facilities: &HostFacilities) -> Result<Self, SizerError> {
        let offsets = facilities.offsets.clone().ok_or_else(|| SizerError::Unavailable {
            kind: SizerKind::Offset,
            reason: "field offset facility is not accessible".to_string(),
        })?;
        Ok(Self { model, offsets })
    }
}

impl ObjectSizer for OffsetSizer {
    fn kind(&self) -> SizerKind {
        SizerKind::Offset
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        let ty = heap.type_of(obj)?;
        let adjustment = self.model.field_offset_adjustment();

        if let Some(element) = ty.element_kind() {
            let length = heap.array_length(obj)?;
            let size = self.offsets.array_base_offset(element)
                + self.offsets.array_index_scale(element) * length
                + adjustment;
            return Ok(self.model.finish(size));
        }

        for class in ty.ancestors() {
            let mut last_offset = None;
            for field in class.declared_fields().iter().filter(|f| !f.is_static()) {
                let offset = self.offsets.field_offset(field)?;
                last_offset = Some(last_offset.map_or(offset, |last: u64| last.max(offset)));
            }
            if let Some(last) = last_offset {
                return Ok(self.model.finish(last + adjustment + 1));
            }
        }
        Ok(self.model.finish(self.model.header_size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldKind, TypeBuilder, Value};
    use crate::model::{MemoryModelVariant, PrimitiveKind};

    fn sizer() -> OffsetSizer {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        OffsetSizer::new(model, &HostFacilities::attached(model)).unwrap()
    }

    #[test]
    fn test_unavailable_without_offsets() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        assert!(OffsetSizer::new(model, &HostFacilities::none()).is_err());
    }

    #[test]
    fn test_instance_sizes() {
        let sizer = sizer();
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let holder = TypeBuilder::class("Holder")
            .extends(&object)
            .field("value", FieldKind::Reference)
            .build();
        let flagged = TypeBuilder::class("Flagged")
            .extends(&holder)
            .field("flag", PrimitiveKind::Byte)
            .build();

        let empty = heap.new_instance(&object).unwrap();
        let one = heap.new_instance(&holder).unwrap();
        let two = heap.new_instance(&flagged).unwrap();
        assert_eq!(sizer.size_of(&heap, empty).unwrap(), 16);
        assert_eq!(sizer.size_of(&heap, one).unwrap(), 24);
        assert_eq!(sizer.size_of(&heap, two).unwrap(), 32);
    }

    #[test]
    fn test_array_sizes() {
        let sizer = sizer();
        let mut heap = Heap::new();
        let refs = TypeBuilder::array("Object[]", FieldKind::Reference).build();
        let arr = heap.new_array(&refs, vec![Value::Null; 3]).unwrap();
        assert_eq!(sizer.size_of(&heap, arr).unwrap(), 48);
    }
}
