// Tue Jan 13 2026 - Alex

use crate::filter::FilterError;
use crate::heap::HeapError;
use crate::sizer::SizerError;
use thiserror::Error;

/// Raised by a [`crate::walker::VisitListener`] to stop a walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ListenerError(pub String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    #[error("The configured limit of {limit} visited objects was reached after measuring {measured} bytes")]
    VisitLimitExceeded { limit: u64, measured: u64 },
    #[error("Walk stopped by listener: {0}")]
    Listener(#[from] ListenerError),
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("Heap error: {0}")]
    Heap(#[from] HeapError),
    #[error("Sizer error: {0}")]
    Sizer(#[from] SizerError),
}
