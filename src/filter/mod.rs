// Tue Jan 13 2026 - Alex

pub mod combination;
pub mod declarative;
pub mod error;
pub mod field_filter;
pub mod policy;
pub mod source;
pub mod type_filter;

pub use combination::CombinationFilter;
pub use declarative::{DeclarativeExclusionFilter, MarkerMatcher, RegexMarkerMatcher, DEFAULT_MARKER_PATTERN};
pub use error::FilterError;
pub use field_filter::FieldExclusionFilter;
pub use policy::{PassThroughFilter, SizeOfFilter};
pub use source::{FilterConfigurator, FilterSource};
pub use type_filter::TypeExclusionFilter;
