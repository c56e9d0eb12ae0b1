// Wed Jan 15 2026 - Alex

use crate::heap::{FieldDescriptor, FieldId, FieldKind, FieldRef, Heap, HeapError, ObjectId, TypeRef, WeakTypeMap};
use crate::model::{round_up, RuntimeMemoryModel, SizeClass};
use ahash::AHashMap;
use std::sync::Arc;

/// Privileged facility that reports the raw size of a single object.
pub trait Instrumentation: Send + Sync {
    fn object_size(&self, heap: &Heap, obj: ObjectId) -> Result<u64, HeapError>;
}

/// Low-level facility exposing where the host stores fields and array elements.
pub trait FieldOffsets: Send + Sync {
    fn field_offset(&self, field: &FieldDescriptor) -> Result<u64, HeapError>;
    fn array_base_offset(&self, element: FieldKind) -> u64;
    fn array_index_scale(&self, element: FieldKind) -> u64;
}

/// Facilities the host granted to this process. Either may be missing.
#[derive(Clone, Default)]
pub struct HostFacilities {
    pub instrumentation: Option<Arc<dyn Instrumentation>>,
    pub offsets: Option<Arc<dyn FieldOffsets>>,
}

impl HostFacilities {
    pub fn none() -> Self {
        Self::default()
    }

    /// Both facilities backed by the host's own allocator layout.
    pub fn attached(model: RuntimeMemoryModel) -> Self {
        let layout = Arc::new(HostLayout::new(model));
        Self {
            instrumentation: Some(layout.clone()),
            offsets: Some(layout),
        }
    }

    pub fn with_instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    pub fn with_offsets(mut self, offsets: Arc<dyn FieldOffsets>) -> Self {
        self.offsets = Some(offsets);
        self
    }

    pub fn without_instrumentation(mut self) -> Self {
        self.instrumentation = None;
        self
    }

    pub fn has_instrumentation(&self) -> bool {
        self.instrumentation.is_some()
    }

    pub fn has_offsets(&self) -> bool {
        self.offsets.is_some()
    }
}

impl std::fmt::Debug for HostFacilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFacilities")
            .field("instrumentation", &self.has_instrumentation())
            .field("offsets", &self.has_offsets())
            .finish()
    }
}

#[derive(Debug, Clone)]
struct InstanceLayout {
    offsets: AHashMap<FieldId, u64>,
    size: u64,
}

/// Where the host allocator places fields for a given memory model.
///
/// Classes are laid out base first. Within a class, long fields come first,
/// then ints, shorts, bytes and finally references; when the long block needs
/// realignment, smaller fields are moved into the gap.
pub struct HostLayout {
    model: RuntimeMemoryModel,
    layouts: WeakTypeMap<Arc<InstanceLayout>>,
}

impl HostLayout {
    pub fn new(model: RuntimeMemoryModel) -> Self {
        Self {
            model,
            layouts: WeakTypeMap::new(),
        }
    }

    pub fn model(&self) -> &RuntimeMemoryModel {
        &self.model
    }

    fn layout(&self, ty: &TypeRef) -> Arc<InstanceLayout> {
        self.layouts
            .get_or_insert_with(ty, || Arc::new(self.compute_layout(ty)))
    }

    fn compute_layout(&self, ty: &TypeRef) -> InstanceLayout {
        let mut hierarchy: Vec<_> = ty.ancestors().collect();
        hierarchy.reverse();

        let reference_width = self.model.reference_width();
        let mut offsets = AHashMap::new();
        let mut cursor = self.model.header_size();

        for class in hierarchy {
            let mut groups: [Vec<&FieldRef>; 5] = Default::default();
            for field in class.declared_fields().iter().filter(|f| !f.is_static()) {
                groups[group_of(field.kind())].push(field);
            }
            let any = groups.iter().any(|g| !g.is_empty());

            if !groups[LONGS].is_empty() && cursor % 8 != 0 {
                let mut gap_start = cursor;
                let gap_end = round_up(cursor, 8);
                for (group, width) in [(INTS, 4), (SHORTS, 2), (BYTES, 1), (REFS, reference_width)] {
                    while gap_end - gap_start >= width && !groups[group].is_empty() {
                        let field = groups[group].remove(0);
                        offsets.insert(field.id(), gap_start);
                        gap_start += width;
                    }
                }
                cursor = gap_end;
            }

            for (group, width) in [(LONGS, 8), (INTS, 4), (SHORTS, 2), (BYTES, 1)] {
                for field in &groups[group] {
                    offsets.insert(field.id(), cursor);
                    cursor += width;
                }
            }
            if !groups[REFS].is_empty() {
                cursor = round_up(cursor, reference_width);
                for field in &groups[REFS] {
                    offsets.insert(field.id(), cursor);
                    cursor += reference_width;
                }
            }
            if any {
                cursor = round_up(cursor, reference_width);
            }
        }

        InstanceLayout {
            offsets,
            size: self.model.finish(cursor),
        }
    }
}

const LONGS: usize = 0;
const INTS: usize = 1;
const SHORTS: usize = 2;
const BYTES: usize = 3;
const REFS: usize = 4;

fn group_of(kind: FieldKind) -> usize {
    match kind {
        FieldKind::Reference => REFS,
        FieldKind::Primitive(p) => match p.size_class() {
            SizeClass::Eight => LONGS,
            SizeClass::Four => INTS,
            SizeClass::Two => SHORTS,
            SizeClass::One => BYTES,
        },
    }
}

impl Instrumentation for HostLayout {
    fn object_size(&self, heap: &Heap, obj: ObjectId) -> Result<u64, HeapError> {
        let ty = heap.type_of(obj)?;
        match ty.element_kind() {
            Some(element) => {
                let length = heap.array_length(obj)?;
                Ok(self
                    .model
                    .finish(self.array_base_offset(element) + length * self.array_index_scale(element)))
            }
            None => Ok(self.layout(ty).size),
        }
    }
}

impl FieldOffsets for HostLayout {
    fn field_offset(&self, field: &FieldDescriptor) -> Result<u64, HeapError> {
        if field.is_static() {
            return Err(HeapError::StaticField(field.to_string()));
        }
        let owner = field
            .declaring_type()
            .ok_or_else(|| HeapError::TypeUnloaded(field.to_string()))?;
        self.layout(&owner)
            .offsets
            .get(&field.id())
            .copied()
            .ok_or_else(|| HeapError::FieldNotFound(field.to_string()))
    }

    fn array_base_offset(&self, _element: FieldKind) -> u64 {
        self.model.array_header_size()
    }

    fn array_index_scale(&self, element: FieldKind) -> u64 {
        element.size(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::TypeBuilder;
    use crate::model::{MemoryModelVariant, PrimitiveKind};

    fn hotspot64() -> RuntimeMemoryModel {
        RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64)
    }

    #[test]
    fn test_small_fields_fill_the_long_gap() {
        let layout = HostLayout::new(hotspot64().with_header_size(12));
        let ty = TypeBuilder::class("Mixed")
            .field("total", PrimitiveKind::Long)
            .field("count", PrimitiveKind::Int)
            .field("flag", PrimitiveKind::Boolean)
            .build();
        let fields = ty.declared_fields();
        assert_eq!(layout.field_offset(&fields[1]).unwrap(), 12);
        assert_eq!(layout.field_offset(&fields[0]).unwrap(), 16);
        assert_eq!(layout.field_offset(&fields[2]).unwrap(), 24);
    }

    #[test]
    fn test_subclass_fields_follow_base_fields() {
        let layout = HostLayout::new(hotspot64());
        let base = TypeBuilder::class("Base").field("a", PrimitiveKind::Int).build();
        let derived = TypeBuilder::class("Derived")
            .extends(&base)
            .field("next", FieldKind::Reference)
            .build();
        assert_eq!(layout.field_offset(&base.declared_fields()[0]).unwrap(), 16);
        assert_eq!(layout.field_offset(&derived.declared_fields()[0]).unwrap(), 24);
    }

    #[test]
    fn test_array_size_uses_base_and_scale() {
        let model = hotspot64();
        let layout = HostLayout::new(model);
        let mut heap = Heap::new();
        let ints = TypeBuilder::array("int[]", PrimitiveKind::Int).build();
        let arr = heap
            .new_array(&ints, vec![crate::heap::PrimitiveValue::Int(1).into(); 4])
            .unwrap();
        assert_eq!(layout.object_size(&heap, arr).unwrap(), 40);
        assert_eq!(layout.array_index_scale(FieldKind::Reference), 8);
    }
}
