//! Error types for authorizer resolution

use gatekeep_model::{ModelError, ShapeId};
use thiserror::Error;

/// Authorizer index errors
///
/// Missing or dangling authorizers are never errors; lookups return
/// `None` for them. Only broken model contracts and rejected divergent
/// resolutions end up here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Model or path enumeration contract violation
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Two binding paths resolve the same shape to different authorizers
    #[error(
        "Divergent authorizers for {shape} in {service}: '{previous}' and '{current}'"
    )]
    DivergentResolution {
        service: ShapeId,
        shape: ShapeId,
        previous: String,
        current: String,
    },
}

/// Result type for authorizer operations
pub type Result<T> = std::result::Result<T, AuthzError>;
