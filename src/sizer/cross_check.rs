// Wed Jan 15 2026 - Alex

use crate::heap::{Heap, HostFacilities, ObjectId};
use crate::model::RuntimeMemoryModel;
use crate::sizer::{available_sizers, build_sizer, ObjectSizer, SizerError, SizerKind};
use itertools::Itertools;

/// Runs every usable strategy and fails when any two disagree.
///
/// Meant for verifying a memory model against a host, not for production
/// sizing. The structural strategy is left out on models where it is known
/// to be inaccurate.
pub struct CrossCheckingSizer {
    sizers: Vec<Box<dyn ObjectSizer>>,
}

impl CrossCheckingSizer {
    pub fn new(model: RuntimeMemoryModel, facilities: &HostFacilities) -> Result<Self, SizerError> {
        let sizers = available_sizers(&SizerKind::DEFAULT_ORDER, facilities)
            .into_iter()
            .filter(|kind| *kind != SizerKind::Structural || model.supports_structural())
            .map(|kind| build_sizer(kind, model, facilities))
            .collect::<Result<Vec<_>, _>>()?;
        if sizers.is_empty() {
            return Err(SizerError::NoStrategyAvailable(format!(
                "nothing to cross check on {}",
                model.description()
            )));
        }
        Ok(Self { sizers })
    }

    pub fn strategies(&self) -> Vec<SizerKind> {
        self.sizers.iter().map(|s| s.kind()).collect()
    }
}

impl ObjectSizer for CrossCheckingSizer {
    fn kind(&self) -> SizerKind {
        self.sizers[0].kind()
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        let sizes = self
            .sizers
            .iter()
            .map(|sizer| Ok((sizer.kind(), sizer.size_of(heap, obj)?)))
            .collect::<Result<Vec<_>, SizerError>>()?;

        if !sizes.iter().map(|(_, size)| size).all_equal() {
            let ty = heap.type_of(obj)?;
            return Err(SizerError::Disagreement {
                object: format!("{} {}", ty, obj),
                sizes: sizes
                    .iter()
                    .map(|(kind, size)| format!("{}={}", kind, size))
                    .join(", "),
            });
        }
        Ok(sizes[0].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{FieldKind, HeapError, Instrumentation, TypeBuilder};
    use crate::model::{MemoryModelVariant, PrimitiveKind};
    use std::sync::Arc;

    struct Lying;

    impl Instrumentation for Lying {
        fn object_size(&self, _heap: &Heap, _obj: ObjectId) -> Result<u64, HeapError> {
            Ok(1024)
        }
    }

    #[test]
    fn test_strategies_agree_on_host_layout() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64CompressedOops);
        let sizer = CrossCheckingSizer::new(model, &HostFacilities::attached(model)).unwrap();
        assert_eq!(sizer.strategies().len(), 3);

        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let node = TypeBuilder::class("Node")
            .extends(&object)
            .field("next", FieldKind::Reference)
            .field("weight", PrimitiveKind::Double)
            .field("id", PrimitiveKind::Int)
            .field("tag", PrimitiveKind::Char)
            .build();
        let leaf = TypeBuilder::class("Leaf")
            .extends(&node)
            .field("flag", PrimitiveKind::Boolean)
            .build();
        for ty in [&object, &node, &leaf] {
            let obj = heap.new_instance(ty).unwrap();
            assert!(sizer.size_of(&heap, obj).is_ok(), "{}", ty);
        }
        let s = heap.new_string("hello").unwrap();
        assert!(sizer.size_of(&heap, s).is_ok());
    }

    #[test]
    fn test_disagreement_is_an_error() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        let facilities = HostFacilities::attached(model).with_instrumentation(Arc::new(Lying));
        let sizer = CrossCheckingSizer::new(model, &facilities).unwrap();
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let obj = heap.new_instance(&object).unwrap();
        assert!(matches!(
            sizer.size_of(&heap, obj),
            Err(SizerError::Disagreement { .. })
        ));
    }

    #[test]
    fn test_structural_left_out_where_inaccurate() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::Ibm64);
        assert!(CrossCheckingSizer::new(model, &HostFacilities::none()).is_err());
        let sizer = CrossCheckingSizer::new(model, &HostFacilities::attached(model)).unwrap();
        assert_eq!(sizer.strategies(), vec![SizerKind::Agent, SizerKind::Offset]);
    }
}
