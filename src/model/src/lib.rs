//! # Gatekeep shape model
//!
//! In-memory model of an API as a graph of typed shapes.
//!
//! ## Features
//!
//! - **Shape ids**: absolute `namespace#Name$member` identifiers
//! - **Trait attachment**: raw JSON trait values with typed access via [`ShapeTrait`]
//! - **Binding graph**: service/resource containment and resource lifecycle bindings
//! - **Path enumeration**: every root-to-target binding path, in a deterministic order
//!
//! ## Module Structure
//!
//! ```text
//! model/
//! ├── shape_id/   - Shape identifiers
//! ├── shape/      - Shapes, kinds, traits, relationships
//! ├── model/      - Immutable model and validating builder
//! └── path/       - Binding graph and path enumeration
//! ```

pub mod error;
pub mod model;
pub mod path;
pub mod shape;
pub mod shape_id;

pub use error::{ModelError, Result};
pub use model::{Model, ModelBuilder, ShapeGraph};
pub use path::{Path, PathEnumerator, PathFinder};
pub use shape::{Relationship, RelationshipKind, Shape, ShapeKind, ShapeTrait};
pub use shape_id::ShapeId;
