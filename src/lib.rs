// Tue Jan 15 2026 - Alex

pub mod config;
pub mod engine;
pub mod filter;
pub mod heap;
pub mod introspect;
pub mod model;
pub mod sizer;
pub mod utils;
pub mod walker;

pub use config::{ConfigError, SizeOfConfig};
pub use engine::{EngineFactory, Size, SizeOfEngine, SizeOfError};
pub use filter::{FilterSource, SizeOfFilter};
pub use heap::{Heap, HostFacilities, ObjectId, TypeBuilder, TypeRef};
pub use model::{MemoryModelVariant, RuntimeMemoryModel};
pub use sizer::{ObjectSizer, SizerKind};
pub use walker::{VisitLimit, VisitListener};
