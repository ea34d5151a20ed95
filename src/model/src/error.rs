//! Error types for the shape model

use thiserror::Error;

use crate::shape::{RelationshipKind, ShapeKind};
use crate::shape_id::ShapeId;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid shape id '{id}': {reason}")]
    InvalidShapeId { id: String, reason: String },

    #[error("Duplicate shape: {0}")]
    DuplicateShape(ShapeId),

    #[error("Shape not found: {0}")]
    UnknownShape(ShapeId),

    #[error("Invalid {relationship:?} binding from {from_kind:?} {from} to {to_kind:?} {to}")]
    InvalidBinding {
        relationship: RelationshipKind,
        from: ShapeId,
        from_kind: ShapeKind,
        to: ShapeId,
        to_kind: ShapeKind,
    },

    #[error("Invalid value for trait {trait_id} on {shape}: {reason}")]
    InvalidTrait {
        shape: ShapeId,
        trait_id: String,
        reason: String,
    },

    #[error("Cycle detected in binding relationships at {0}")]
    CycleDetected(ShapeId),
}
