// Tue Jan 13 2026 - Alex

use crate::heap::{Heap, ObjectId};
use crate::sizer::SizerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Computes the footprint of one object, excluding anything it references.
pub trait ObjectSizer: Send + Sync {
    fn kind(&self) -> SizerKind;

    fn size_of(&self, heap: &Heap, obj: ObjectId) -> Result<u64, SizerError>;
}

/// Sizing strategies, from most to least precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizerKind {
    Agent,
    Offset,
    Structural,
}

impl SizerKind {
    pub const DEFAULT_ORDER: [SizerKind; 3] = [SizerKind::Agent, SizerKind::Offset, SizerKind::Structural];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Offset => "offset",
            Self::Structural => "structural",
        }
    }
}

impl fmt::Display for SizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "agent" => Ok(Self::Agent),
            "offset" | "unsafe" => Ok(Self::Offset),
            "structural" | "reflection" => Ok(Self::Structural),
            other => Err(format!("unknown sizing strategy: {}", other)),
        }
    }
}
