// Tue Jan 13 2026 - Alex

pub mod agent;
pub mod caching;
pub mod cross_check;
pub mod error;
pub mod fallback;
pub mod offset;
pub mod structural;
pub mod traits;

pub use agent::AgentSizer;
pub use caching::CachingSizer;
pub use cross_check::CrossCheckingSizer;
pub use error::SizerError;
pub use fallback::{available_sizers, build_sizer, FallbackSizer};
pub use offset::OffsetSizer;
pub use structural::StructuralSizer;
pub use traits::{ObjectSizer, SizerKind};
