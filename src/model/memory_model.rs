// Tue Jan 15 2026 - Alex

use crate::model::{round_up, Alignment, MemoryModelVariant, PrimitiveKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout rules of the host runtime, derived once from a [`MemoryModelVariant`].
///
/// The model is plain data: it is built at startup (usually by
/// [`crate::model::detect`]) and handed to every sizer that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeMemoryModel {
    variant: MemoryModelVariant,
    pointer_width: u64,
    reference_width: u64,
    min_object_size: u64,
    object_alignment: Alignment,
    header_size: u64,
    field_offset_adjustment: u64,
    agent_adjustment: u64,
    primitive_sizes: [u64; 8],
    supports_structural: bool,
}

/// Slot holding an array's length, right after the object header.
pub const ARRAY_LENGTH_SLOT: u64 = 4;

impl RuntimeMemoryModel {
    pub fn from_variant(variant: MemoryModelVariant) -> Self {
        let entry = variant.entry();
        let base = entry.family.baseline();
        let overrides = entry.overrides;

        let reference_width = overrides.reference_width.unwrap_or(base.reference_width);
        let header_size = overrides
            .header_size
            .unwrap_or(base.pointer_width + reference_width);
        let min_object_size = overrides.min_object_size.unwrap_or(base.object_alignment);

        let mut primitive_sizes = [0u64; 8];
        for kind in PrimitiveKind::ALL {
            primitive_sizes[kind.index()] = kind.size();
        }

        Self {
            variant,
            pointer_width: base.pointer_width,
            reference_width,
            min_object_size,
            object_alignment: Alignment::new(base.object_alignment),
            header_size,
            field_offset_adjustment: base.field_offset_adjustment,
            agent_adjustment: base.agent_adjustment,
            primitive_sizes,
            supports_structural: overrides.supports_structural,
        }
    }

    pub fn with_header_size(mut self, header_size: u64) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn with_reference_width(mut self, reference_width: u64) -> Self {
        self.reference_width = reference_width;
        self
    }

    pub fn with_min_object_size(mut self, min_object_size: u64) -> Self {
        self.min_object_size = min_object_size;
        self
    }

    pub fn with_object_alignment(mut self, alignment: Alignment) -> Self {
        self.object_alignment = alignment;
        self
    }

    pub fn variant(&self) -> MemoryModelVariant {
        self.variant
    }

    pub fn description(&self) -> &'static str {
        self.variant.description()
    }

    pub fn pointer_width(&self) -> u64 {
        self.pointer_width
    }

    pub fn reference_width(&self) -> u64 {
        self.reference_width
    }

    pub fn min_object_size(&self) -> u64 {
        self.min_object_size
    }

    pub fn object_alignment(&self) -> Alignment {
        self.object_alignment
    }

    pub fn header_size(&self) -> u64 {
        self.header_size
    }

    pub fn field_offset_adjustment(&self) -> u64 {
        self.field_offset_adjustment
    }

    pub fn agent_adjustment(&self) -> u64 {
        self.agent_adjustment
    }

    pub fn primitive_size(&self, kind: PrimitiveKind) -> u64 {
        self.primitive_sizes[kind.index()]
    }

    pub fn array_header_size(&self) -> u64 {
        self.header_size + ARRAY_LENGTH_SLOT
    }

    pub fn supports_structural(&self) -> bool {
        self.supports_structural
    }

    /// Rounds `size` up to the object alignment and clamps it to the minimum object size.
    pub fn finish(&self, size: u64) -> u64 {
        self.object_alignment.align(size).max(self.min_object_size)
    }

    pub(crate) fn align_to_reference(&self, offset: u64) -> u64 {
        round_up(offset, self.reference_width)
    }
}

impl fmt::Display for RuntimeMemoryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (pointer: {}, reference: {}, header: {}, alignment: {}, min object: {})",
            self.description(),
            self.pointer_width,
            self.reference_width,
            self.header_size,
            self.object_alignment.as_u64(),
            self.min_object_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotspot_64_defaults() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64);
        assert_eq!(model.pointer_width(), 8);
        assert_eq!(model.reference_width(), 8);
        assert_eq!(model.header_size(), 16);
        assert_eq!(model.min_object_size(), 8);
        assert_eq!(model.array_header_size(), 20);
        assert_eq!(model.primitive_size(PrimitiveKind::Long), 8);
    }

    #[test]
    fn test_compressed_oops_shrinks_header() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::OpenJdk64CompressedOopsCms);
        assert_eq!(model.reference_width(), 4);
        assert_eq!(model.header_size(), 12);
        assert_eq!(model.min_object_size(), 24);
    }

    #[test]
    fn test_ibm_overrides() {
        let ibm64 = RuntimeMemoryModel::from_variant(MemoryModelVariant::Ibm64);
        assert_eq!(ibm64.header_size(), 24);
        assert!(!ibm64.supports_structural());

        let compressed = RuntimeMemoryModel::from_variant(MemoryModelVariant::Ibm64CompressedRefs);
        assert_eq!(compressed.pointer_width(), 4);
        assert_eq!(compressed.header_size(), 16);
    }

    #[test]
    fn test_finish_rounds_and_clamps() {
        let model = RuntimeMemoryModel::from_variant(MemoryModelVariant::HotSpot64Cms);
        assert_eq!(model.finish(17), 24);
        assert_eq!(model.finish(8), 24);
        assert_eq!(model.finish(25), 32);
    }
}
