// Wed Jan 15 2026 - Alex

use crate::heap::{Heap, ObjectId};
use crate::introspect::{ClassFieldCounts, StructuralIntrospector};
use crate::model::RuntimeMemoryModel;
use crate::sizer::{ObjectSizer, SizerError, SizerKind};
use log::warn;

const LONG: u64 = 8;
const INT: u64 = 4;
const SHORT: u64 = 2;
const BYTE: u64 = 1;

/// Estimates object sizes by simulating the host's field packing.
///
/// Needs no host facility, so it is always available, but it is only as
/// accurate as the memory model it is given.
pub struct StructuralSizer {
    model: RuntimeMemoryModel,
    introspector: StructuralIntrospector,
}

impl StructuralSizer {
    pub fn new(model: RuntimeMemoryModel) -> Self {
        if !model.supports_structural() {
            warn!(
                "Structural sizing is not always accurate on {}, consider attaching the instrumentation agent",
                model.description()
            );
        }
        Self {
            model,
            introspector: StructuralIntrospector::new(),
        }
    }

    pub fn model(&self) -> &RuntimeMemoryModel {
        &self.model
    }

    /// Instance size from per class field counts, base class first.
    pub fn instance_size(&self, classes: &[ClassFieldCounts]) -> u64 {
        let reference = self.model.reference_width();
        let mut size = self.model.header_size();

        for class in classes {
            let ClassFieldCounts {
                longs,
                mut ints,
                mut shorts,
                mut bytes,
                mut references,
                ..
            } = *class;

            if longs > 0 && size % LONG != 0 {
                let mut gap = LONG - size % LONG;
                size += gap;
                for (width, count) in [
                    (INT, &mut ints),
                    (SHORT, &mut shorts),
                    (BYTE, &mut bytes),
                    (reference, &mut references),
                ] {
                    while gap >= width && *count > 0 {
                        gap -= width;
                        *count -= 1;
                    }
                }
            }

            size += LONG * longs + INT * ints + SHORT * shorts + BYTE * bytes;

            if references > 0 {
                size = self.model.align_to_reference(size) + references * reference;
            }
            if class.total() > 0 {
                size = self.model.align_to_reference(size);
            }
        }
        self.model.finish(size)
    }

    pub fn array_size(&self, element_size: u64, length: u64) -> u64 {
        self.model
            .finish(self.model.array_header_size() + length * element_size)
    }
}

impl ObjectSizer for StructuralSizer {
    fn kind(&self) -> SizerKind {
        SizerKind::Structural
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        let ty = heap.type_of(obj)?;
        match self.introspector.array_info(ty) {
            Some(element) => Ok(self.array_size(element.size(&self.model), heap.array_length(obj)?)),
            None => Ok(self.instance_size(&self.introspector.field_counts(ty))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldKind, PrimitiveValue, TypeBuilder, Value};
    use crate::model::{MemoryModelVariant, PrimitiveKind};

    fn hotspot64() -> StructuralSizer {
        StructuralSizer::new(RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64))
    }

    #[test]
    fn test_single_reference_field() {
        let sizer = hotspot64();
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let holder = TypeBuilder::class("Holder")
            .extends(&object)
            .field("value", FieldKind::Reference)
            .build();
        let obj = heap.new_instance(&holder).unwrap();
        assert_eq!(sizer.size_of(&heap, obj).unwrap(), 24);
    }

    #[test]
    fn test_reference_and_byte_round_up() {
        let sizer = hotspot64();
        let mut heap = Heap::new();
        let ty = TypeBuilder::class("Tagged")
            .field("value", FieldKind::Reference)
            .field("tag", PrimitiveKind::Byte)
            .build();
        let obj = heap.new_instance(&ty).unwrap();
        assert_eq!(sizer.size_of(&heap, obj).unwrap(), 32);
    }

    #[test]
    fn test_gap_before_longs_is_backfilled() {
        let sizer = StructuralSizer::new(
            RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64CompressedOops),
        );
        let mut heap = Heap::new();
        let ty = TypeBuilder::class("Counter")
            .field("total", PrimitiveKind::Long)
            .field("count", PrimitiveKind::Int)
            .build();
        let obj = heap.new_instance(&ty).unwrap();
        // header 12, int fills 12..16, long at 16
        assert_eq!(sizer.size_of(&heap, obj).unwrap(), 24);
    }

    #[test]
    fn test_array_sizes() {
        let sizer = hotspot64();
        let mut heap = Heap::new();
        let refs = TypeBuilder::array("Object[]", FieldKind::Reference).build();
        let ints = TypeBuilder::array("int[]", PrimitiveKind::Int).build();

        let empty = heap.new_array(&refs, Vec::new()).unwrap();
        let four = heap
            .new_array(&ints, vec![Value::Primitive(PrimitiveValue::Int(7)); 4])
            .unwrap();
        assert_eq!(sizer.size_of(&heap, empty).unwrap(), 24);
        assert_eq!(sizer.size_of(&heap, four).unwrap(), 40);
    }

    #[test]
    fn test_empty_object_is_header_only() {
        let sizer = hotspot64();
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let obj = heap.new_instance(&object).unwrap();
        assert_eq!(sizer.size_of(&heap, obj).unwrap(), 16);
    }
}
