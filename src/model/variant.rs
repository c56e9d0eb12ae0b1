// Tue Jan 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag naming a detected host memory model. Layout numbers live in [`CATALOG`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryModelVariant {
    Unknown32,
    Unknown64,
    HotSpot32,
    HotSpot32Cms,
    HotSpot64,
    HotSpot64Cms,
    HotSpot64CompressedOops,
    HotSpot64CompressedOopsCms,
    OpenJdk32,
    OpenJdk32Cms,
    OpenJdk64,
    OpenJdk64Cms,
    OpenJdk64CompressedOops,
    OpenJdk64CompressedOopsCms,
    Ibm32,
    Ibm64,
    Ibm64CompressedRefs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Generic32,
    Generic64,
}

#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub pointer_width: u64,
    pub reference_width: u64,
    pub object_alignment: u64,
    pub field_offset_adjustment: u64,
    pub agent_adjustment: u64,
}

/// Deltas a variant applies on top of its family baseline.
#[derive(Debug, Clone, Copy)]
pub struct Overrides {
    pub reference_width: Option<u64>,
    pub min_object_size: Option<u64>,
    pub header_size: Option<u64>,
    pub supports_structural: bool,
}

impl Overrides {
    pub const NONE: Overrides = Overrides {
        reference_width: None,
        min_object_size: None,
        header_size: None,
        supports_structural: true,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub variant: MemoryModelVariant,
    pub family: Family,
    pub description: &'static str,
    pub overrides: Overrides,
}

const GENERIC_32: Baseline = Baseline {
    pointer_width: 4,
    reference_width: 4,
    object_alignment: 8,
    field_offset_adjustment: 0,
    agent_adjustment: 0,
};

const GENERIC_64: Baseline = Baseline {
    pointer_width: 8,
    reference_width: 8,
    ..GENERIC_32
};

const CMS_32: Overrides = Overrides { min_object_size: Some(16), ..Overrides::NONE };
const CMS_64: Overrides = Overrides { min_object_size: Some(24), ..Overrides::NONE };
const COMPRESSED: Overrides = Overrides { reference_width: Some(4), ..Overrides::NONE };
const COMPRESSED_CMS: Overrides = Overrides {
    reference_width: Some(4),
    min_object_size: Some(24),
    ..Overrides::NONE
};

pub const CATALOG: [CatalogEntry; 17] = [
    entry(MemoryModelVariant::Unknown32, Family::Generic32, "Unrecognized 32-Bit host", Overrides::NONE),
    entry(MemoryModelVariant::Unknown64, Family::Generic64, "Unrecognized 64-Bit host", Overrides::NONE),
    entry(MemoryModelVariant::HotSpot32, Family::Generic32, "32-Bit HotSpot host", Overrides::NONE),
    entry(
        MemoryModelVariant::HotSpot32Cms,
        Family::Generic32,
        "32-Bit HotSpot host with Concurrent Mark-and-Sweep GC",
        CMS_32,
    ),
    entry(MemoryModelVariant::HotSpot64, Family::Generic64, "64-Bit HotSpot host", Overrides::NONE),
    entry(
        MemoryModelVariant::HotSpot64Cms,
        Family::Generic64,
        "64-Bit HotSpot host with Concurrent Mark-and-Sweep GC",
        CMS_64,
    ),
    entry(
        MemoryModelVariant::HotSpot64CompressedOops,
        Family::Generic64,
        "64-Bit HotSpot host with Compressed OOPs",
        COMPRESSED,
    ),
    entry(
        MemoryModelVariant::HotSpot64CompressedOopsCms,
        Family::Generic64,
        "64-Bit HotSpot host with Compressed OOPs and Concurrent Mark-and-Sweep GC",
        COMPRESSED_CMS,
    ),
    entry(MemoryModelVariant::OpenJdk32, Family::Generic32, "32-Bit OpenJDK host", Overrides::NONE),
    entry(
        MemoryModelVariant::OpenJdk32Cms,
        Family::Generic32,
        "32-Bit OpenJDK host with Concurrent Mark-and-Sweep GC",
        CMS_32,
    ),
    entry(MemoryModelVariant::OpenJdk64, Family::Generic64, "64-Bit OpenJDK host", Overrides::NONE),
    entry(
        MemoryModelVariant::OpenJdk64Cms,
        Family::Generic64,
        "64-Bit OpenJDK host with Concurrent Mark-and-Sweep GC",
        CMS_64,
    ),
    entry(
        MemoryModelVariant::OpenJdk64CompressedOops,
        Family::Generic64,
        "64-Bit OpenJDK host with Compressed OOPs",
        COMPRESSED,
    ),
    entry(
        MemoryModelVariant::OpenJdk64CompressedOopsCms,
        Family::Generic64,
        "64-Bit OpenJDK host with Compressed OOPs and Concurrent Mark-and-Sweep GC",
        COMPRESSED_CMS,
    ),
    entry(
        MemoryModelVariant::Ibm32,
        Family::Generic32,
        "IBM 32-Bit host",
        Overrides { header_size: Some(16), supports_structural: false, ..Overrides::NONE },
    ),
    entry(
        MemoryModelVariant::Ibm64,
        Family::Generic64,
        "IBM 64-Bit host (with no reference compression)",
        Overrides { header_size: Some(24), supports_structural: false, ..Overrides::NONE },
    ),
    // compressed references put the 64-bit IBM host on the 32-bit layout
    entry(
        MemoryModelVariant::Ibm64CompressedRefs,
        Family::Generic32,
        "IBM 64-Bit host with Compressed References",
        Overrides { header_size: Some(16), supports_structural: false, ..Overrides::NONE },
    ),
];

const fn entry(
    variant: MemoryModelVariant,
    family: Family,
    description: &'static str,
    overrides: Overrides,
) -> CatalogEntry {
    CatalogEntry {
        variant,
        family,
        description,
        overrides,
    }
}

impl Family {
    pub fn baseline(self) -> Baseline {
        match self {
            Self::Generic32 => GENERIC_32,
            Self::Generic64 => GENERIC_64,
        }
    }
}

impl MemoryModelVariant {
    pub fn entry(self) -> &'static CatalogEntry {
        CATALOG
            .iter()
            .find(|e| e.variant == self)
            .unwrap_or(&CATALOG[0])
    }

    pub fn description(self) -> &'static str {
        self.entry().description
    }

    pub fn generic(is_64_bit: bool) -> Self {
        if is_64_bit {
            Self::Unknown64
        } else {
            Self::Unknown32
        }
    }
}

impl fmt::Display for MemoryModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
