// Tue Jan 13 2026 - Alex

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::heap::HeapError;
use crate::sizer::SizerError;
use crate::walker::ListenerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SizeOfError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Sizer error: {0}")]
    Sizer(#[from] SizerError),
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("Heap error: {0}")]
    Heap(#[from] HeapError),
    #[error("Measurement stopped: {0}")]
    Listener(#[from] ListenerError),
}
