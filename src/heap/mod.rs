// Tue Jan 13 2026 - Alex

pub mod builder;
pub mod error;
pub mod facility;
pub mod field;
pub mod heap;
pub mod object;
pub mod types;
pub mod weak_map;
pub mod well_known;

pub use builder::TypeBuilder;
pub use error::HeapError;
pub use facility::{FieldOffsets, HostFacilities, HostLayout, Instrumentation};
pub use field::{FieldDescriptor, FieldId, FieldKind, FieldRef, FieldSpec};
pub use heap::{Heap, DEFAULT_SMALL_VALUE_CACHE};
pub use object::{HeapObject, ObjectBody, ObjectId, PrimitiveValue, Value};
pub use types::{
    Builtin, Marker, PackageDescriptor, PackageRef, TypeDescriptor, TypeFlags, TypeKey, TypeRef,
    TypeShape,
};
pub use weak_map::WeakTypeMap;
pub use well_known::{BuiltinTypes, WellKnown};
