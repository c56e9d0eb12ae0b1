// Tue Jan 13 2026 - Alex

pub mod cache;
pub mod introspector;

pub use cache::FieldAndClassCache;
pub use introspector::{ClassFieldCounts, StructuralIntrospector};
