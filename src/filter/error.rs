// Tue Jan 13 2026 - Alex

use crate::heap::HeapError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("More than one exclusion marker matches {element}: {markers:?}")]
    AmbiguousMarker { element: String, markers: Vec<String> },
    #[error("Invalid marker pattern: {0}")]
    InvalidPattern(String),
    #[error("Heap error: {0}")]
    Heap(#[from] HeapError),
}

impl From<regex::Error> for FilterError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}
