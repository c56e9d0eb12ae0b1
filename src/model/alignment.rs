// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Alignment {
    value: u64,
}

impl Alignment {
    pub fn new(value: u64) -> Self {
        assert!(value > 0 && value.is_power_of_two());
        Self { value }
    }

    pub fn try_new(value: u64) -> Option<Self> {
        (value > 0 && value.is_power_of_two()).then_some(Self { value })
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn align(&self, offset: u64) -> u64 {
        (offset + self.value - 1) & !(self.value - 1)
    }

    pub fn is_aligned(&self, offset: u64) -> bool {
        offset & (self.value - 1) == 0
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::new(8)
    }
}

impl TryFrom<u64> for Alignment {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::try_new(value).ok_or_else(|| format!("alignment {} is not a power of two", value))
    }
}

impl From<Alignment> for u64 {
    fn from(alignment: Alignment) -> Self {
        alignment.value
    }
}

/// Rounds `offset` up to the next multiple of `unit`, which need not be a power of two.
pub fn round_up(offset: u64, unit: u64) -> u64 {
    if unit == 0 || offset % unit == 0 {
        offset
    } else {
        offset + unit - offset % unit
    }
}
