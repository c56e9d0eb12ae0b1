// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a deep measurement.
///
/// `exact` is false when the visited-object limit cut the measurement short
/// or was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub calculated: u64,
    pub exact: bool,
}

impl Size {
    pub fn new(calculated: u64, exact: bool) -> Self {
        Self { calculated, exact }
    }

    pub fn exact(calculated: u64) -> Self {
        Self::new(calculated, true)
    }

    pub fn zero() -> Self {
        Self::exact(0)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{} bytes", self.calculated)
        } else {
            write!(f, "at least {} bytes", self.calculated)
        }
    }
}
