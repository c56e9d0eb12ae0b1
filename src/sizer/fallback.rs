// Wed Jan 15 2026 - Alex

use crate::heap::{Heap, HostFacilities, ObjectId};
use crate::model::RuntimeMemoryModel;
use crate::sizer::{AgentSizer, ObjectSizer, OffsetSizer, SizerError, SizerKind, StructuralSizer};
use itertools::Itertools;
use log::debug;

/// Builds one strategy, failing when the host lacks the facility it needs.
pub fn build_sizer(
    kind: SizerKind,
    model: RuntimeMemoryModel,
    facilities: &HostFacilities,
) -> Result<Box<dyn ObjectSizer>, SizerError> {
    Ok(match kind {
        SizerKind::Agent => Box::new(AgentSizer::new(model, facilities)?),
        SizerKind::Offset => Box::new(OffsetSizer::new(model, facilities)?),
        SizerKind::Structural => Box::new(StructuralSizer::new(model)),
    })
}

/// Strategies of `order` that can be built on this host, in that order.
pub fn available_sizers(order: &[SizerKind], facilities: &HostFacilities) -> Vec<SizerKind> {
    order
        .iter()
        .copied()
        .filter(|kind| match kind {
            SizerKind::Agent => facilities.has_instrumentation(),
            SizerKind::Offset => facilities.has_offsets(),
            SizerKind::Structural => true,
        })
        .collect()
}

/// The first strategy of a preference order that the host supports.
///
/// The choice is made once, at construction; a strategy that is unavailable
/// then is never retried.
pub struct FallbackSizer {
    selected: Box<dyn ObjectSizer>,
}

impl FallbackSizer {
    pub fn new(
        model: RuntimeMemoryModel,
        facilities: &HostFacilities,
        order: &[SizerKind],
    ) -> Result<Self, SizerError> {
        let mut failures = Vec::new();
        for &kind in order {
            match build_sizer(kind, model, facilities) {
                Ok(selected) => return Ok(Self { selected }),
                Err(err) => {
                    debug!("Skipping {} sizing: {}", kind, err);
                    failures.push(err);
                }
            }
        }
        let reasons = if failures.is_empty() {
            "no strategy configured".to_string()
        } else {
            failures.iter().join(", ")
        };
        Err(SizerError::NoStrategyAvailable(reasons))
    }

    pub fn selected(&self) -> SizerKind {
        self.selected.kind()
    }
}

impl ObjectSizer for FallbackSizer {
    fn kind(&self) -> SizerKind {
        self.selected.kind()
    }

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError> {
        self.selected.size_of(heap, obj)
    }
}
