// Tue Jan 13 2026 - Alex

use crate::heap::{Heap, HostFacilities, Instrumentation, ObjectId};
use crate::model::RuntimeMemoryModel;
use crate::sizer::{ObjectSizer, SizerError, SizerKind};
use std::sync::Arc;

/// Asks the host's instrumentation facility for the object size.
pub struct AgentSizer {
    model: RuntimeMemoryModel,
    instrumentation: Arc<dyn Instrumentation>,
}

impl AgentSizer {
    pub fn new(model: RuntimeMemoryModel, facilities: &HostFacilities) -> Result<Self, SizerError> {
        let instrumentation = facilities
            .instrumentation
            .clone()
            .ok_or_else(|| SizerError::Unavailable {
                kind: SizerKind::Agent,
                reason: "instrumentation facility is not attached".to_string(),
            })?;
        Ok(Self { model, instrumentation })
    }
}

impl ObjectSizer for AgentSizer {
    fn kind(&self) -> SizerKind {
        SizerKind::Agent
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        let raw = self.instrumentation.object_size(heap, obj)?;
        Ok((raw + self.model.agent_adjustment()).max(self.model.min_object_size()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapError;
    use crate::model::MemoryModelVariant;

    struct Fixed(u64);

    impl Instrumentation for Fixed {
        fn object_size(&self, _heap: &Heap, _obj: ObjectId) -> Result<u64, HeapError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_unavailable_without_instrumentation() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        assert!(matches!(
            AgentSizer::new(model, &HostFacilities::none()),
            Err(SizerError::Unavailable { kind: SizerKind::Agent, .. })
        ));
    }

    #[test]
    fn test_clamps_to_minimum_object_size() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64Cms);
        let mut heap = Heap::new();
        let object = heap.object_type().clone();
        let obj = heap.new_instance(&object).unwrap();

        let tiny = AgentSizer::new(model, &HostFacilities::none().with_instrumentation(Arc::new(Fixed(8)))).unwrap();
        assert_eq!(tiny.size_of(&heap, obj).unwrap(), 24);

        let large = AgentSizer::new(model, &HostFacilities::none().with_instrumentation(Arc::new(Fixed(48)))).unwrap();
        assert_eq!(large.size_of(&heap, obj).unwrap(), 48);
    }
}
