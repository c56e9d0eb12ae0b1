// Tue Jan 13 2026 - Alex

pub mod alignment;
pub mod detect;
pub mod memory_model;
pub mod primitive;
pub mod variant;

pub use alignment::{round_up, Alignment};
pub use detect::{detect, detect_from_env, detect_variant, HostProbe};
pub use memory_model::{RuntimeMemoryModel, ARRAY_LENGTH_SLOT};
pub use primitive::{PrimitiveKind, SizeClass};
pub use variant::{MemoryModelVariant, CATALOG};
