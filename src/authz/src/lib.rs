//! # Gatekeep authorizer resolution
//!
//! Computes the effective API Gateway authorizer of every service,
//! resource and operation in a shape model.
//!
//! ## Features
//!
//! - **Nearest ancestor wins**: an operation's own `authorizer` trait beats
//!   its resource's, which beats the service's
//! - **Definition lookup**: resolved names are matched against the
//!   service's `authorizers` table
//! - **Immutable index**: built once, then shared across threads without locking
//! - **Configurable divergence handling** for shapes bound along several paths
//!
//! ## Example
//!
//! ```rust
//! use gatekeep_authz::{AuthorizerDefinition, AuthorizerIndex, AuthorizerTrait, AuthorizersTrait};
//! use gatekeep_model::{Model, RelationshipKind, Shape, ShapeId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc: ShapeId = "example#Store".parse()?;
//! let op: ShapeId = "example#ListItems".parse()?;
//!
//! let table = AuthorizersTrait::new()
//!     .with_authorizer("lambda", AuthorizerDefinition::new("aws.auth#sigv4"));
//!
//! let mut builder = Model::builder();
//! builder.add_shape(
//!     Shape::service(svc.clone())
//!         .with_typed_trait(&AuthorizerTrait::new("lambda"))?
//!         .with_typed_trait(&table)?
//!         .with_relationship(RelationshipKind::Operation, op.clone()),
//! )?;
//! builder.add_shape(Shape::operation(op.clone()))?;
//!
//! let index = AuthorizerIndex::from_model(&builder.build()?)?;
//! let definition = index.authorizer_definition_for(&svc, &op).unwrap();
//! assert_eq!(definition.scheme, "aws.auth#sigv4");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! authz/
//! ├── traits/   - Authorizer traits and definitions
//! ├── config/   - Build configuration
//! ├── index/    - Index construction and queries
//! └── error/    - Error types
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod traits;

pub use config::{ConflictPolicy, IndexConfig};
pub use error::{AuthzError, Result};
pub use index::{AuthorizerIndex, DanglingReference, ServiceAuthorizers};
pub use traits::{AuthorizerDefinition, AuthorizerTrait, AuthorizersTrait};
