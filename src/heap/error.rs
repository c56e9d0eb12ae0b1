// Tue Jan 13 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
    #[error("Field not found: {0}")]
    FieldNotFound(String),
    #[error("Access denied to field {0}")]
    AccessDenied(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Static field has no instance storage: {0}")]
    StaticField(String),
    #[error("Declaring type of {0} is no longer loaded")]
    TypeUnloaded(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
}
