// Tue Jan 13 2026 - Alex

use crate::heap::HeapError;
use crate::sizer::SizerKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizerError {
    #[error("{kind} sizing is unavailable: {reason}")]
    Unavailable { kind: SizerKind, reason: String },
    #[error("No sizing strategy could be loaded: {0}")]
    NoStrategyAvailable(String),
    #[error("Sizing strategies disagree on {object}: {sizes}")]
    Disagreement { object: String, sizes: String },
    #[error("Heap error: {0}")]
    Heap(#[from] HeapError),
}
