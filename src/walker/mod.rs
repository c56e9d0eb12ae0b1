// Tue Jan 13 2026 - Alex

pub mod error;
pub mod flyweight;
pub mod listener;
pub mod walker;

pub use error::{ListenerError, WalkError};
pub use flyweight::{FlyweightCatalogConfig, FlyweightClassifier, FlyweightType};
pub use listener::{RecordingListener, VisitListener};
pub use walker::{ObjectGraphWalker, VisitLimit, WalkOutcome};
