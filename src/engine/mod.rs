// Tue Jan 13 2026 - Alex

pub mod engine;
pub mod error;
pub mod factory;
pub mod size;

pub use engine::SizeOfEngine;
pub use error::SizeOfError;
pub use factory::EngineFactory;
pub use size::Size;
