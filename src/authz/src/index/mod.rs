//! Effective authorizer index
//!
//! Computes, for every service in a model, which authorizer applies to
//! the service itself and to each resource and operation bound beneath
//! it. The nearest authorizer trait on the binding path wins: an
//! operation's own trait beats its resource's, which beats the
//! service's.
//!
//! The index is built once and is read-only afterwards, so it can be
//! shared freely between threads.
//!
//! # Example
//!
//! ```rust
//! use gatekeep_authz::{AuthorizerIndex, AuthorizerTrait};
//! use gatekeep_model::{Model, RelationshipKind, Shape, ShapeId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc: ShapeId = "example#Weather".parse()?;
//! let op: ShapeId = "example#GetForecast".parse()?;
//!
//! let mut builder = Model::builder();
//! builder.add_shape(
//!     Shape::service(svc.clone())
//!         .with_typed_trait(&AuthorizerTrait::new("cognito"))?
//!         .with_relationship(RelationshipKind::Operation, op.clone()),
//! )?;
//! builder.add_shape(Shape::operation(op.clone()))?;
//! let model = builder.build()?;
//!
//! let index = AuthorizerIndex::from_model(&model)?;
//! assert_eq!(index.authorizer_for(&svc, &op), Some("cognito"));
//! assert_eq!(index.authorizer(&svc), Some("cognito"));
//! # Ok(())
//! # }
//! ```

mod builder;


use std::collections::BTreeMap;

use gatekeep_model::{Model, PathEnumerator, PathFinder, ShapeGraph, ShapeId};
use tracing::info;

use crate::config::IndexConfig;
use crate::error::Result;
use crate::traits::{AuthorizerDefinition, AuthorizersTrait};
use builder::{BuiltIndex, IndexBuilder};

/// Resolved authorizers and definitions of one service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceAuthorizers {
    resolved: BTreeMap<ShapeId, String>,
    definitions: AuthorizersTrait,
}

impl ServiceAuthorizers {
    /// Effective authorizer name of a shape within this service
    pub fn authorizer(&self, shape: &ShapeId) -> Option<&str> {
        self.resolved.get(shape).map(String::as_str)
    }

    /// Definition of the effective authorizer of a shape
    ///
    /// `None` when nothing resolves, and also when the resolved name has
    /// no entry in the service's definitions.
    pub fn definition(&self, shape: &ShapeId) -> Option<&AuthorizerDefinition> {
        self.authorizer(shape).and_then(|name| self.definitions.get(name))
    }

    /// The service's named authorizer definitions
    pub fn definitions(&self) -> &AuthorizersTrait {
        &self.definitions
    }

    /// Resolved entries in ascending shape id order
    pub fn resolved(&self) -> impl Iterator<Item = (&ShapeId, &str)> {
        self.resolved.iter().map(|(id, name)| (id, name.as_str()))
    }
}

/// A resolved name with no matching definition in its service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub service: ShapeId,
    pub shape: ShapeId,
    pub authorizer: String,
}

/// Effective authorizers of every service in a model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorizerIndex {
    services: BTreeMap<ShapeId, ServiceAuthorizers>,
    ignored_tables: Vec<ShapeId>,
}

impl AuthorizerIndex {
    /// Builds the index from any shape graph and path enumerator
    ///
    /// # Errors
    ///
    /// - `AuthzError::Model` if the graph or enumerator break their
    ///   contracts (unknown shapes, undecodable traits, cycles)
    /// - `AuthzError::DivergentResolution` if binding paths disagree and
    ///   the configuration rejects divergence
    pub fn build<G, E>(graph: &G, paths: &E, config: &IndexConfig) -> Result<Self>
    where
        G: ShapeGraph + ?Sized,
        E: PathEnumerator + ?Sized,
    {
        let BuiltIndex {
            services,
            ignored_tables,
        } = IndexBuilder::new(graph, paths, config).build()?;

        info!(
            services = services.len(),
            resolved = services.values().map(|s| s.resolved.len()).sum::<usize>(),
            ignored_tables = ignored_tables.len(),
            conflict_policy = ?config.conflict_policy,
            "Built authorizer index"
        );

        Ok(Self {
            services,
            ignored_tables,
        })
    }

    /// Builds the index of an in-memory model with the default configuration
    pub fn from_model(model: &Model) -> Result<Self> {
        Self::from_model_with_config(model, &IndexConfig::default())
    }

    pub fn from_model_with_config(model: &Model, config: &IndexConfig) -> Result<Self> {
        let finder = PathFinder::new(model)?;
        Self::build(model, &finder, config)
    }

    /// Effective authorizer name of a service
    pub fn authorizer(&self, service: &ShapeId) -> Option<&str> {
        self.authorizer_for(service, service)
    }

    /// Effective authorizer name of a resource or operation within a service
    pub fn authorizer_for(&self, service: &ShapeId, shape: &ShapeId) -> Option<&str> {
        self.services.get(service)?.authorizer(shape)
    }

    /// Effective authorizer definition of a service
    pub fn authorizer_definition(&self, service: &ShapeId) -> Option<&AuthorizerDefinition> {
        self.authorizer_definition_for(service, service)
    }

    /// Effective authorizer definition of a shape within a service
    pub fn authorizer_definition_for(
        &self,
        service: &ShapeId,
        shape: &ShapeId,
    ) -> Option<&AuthorizerDefinition> {
        self.services.get(service)?.definition(shape)
    }

    /// Per-service view, `None` for shapes that are not indexed services
    pub fn service(&self, service: &ShapeId) -> Option<&ServiceAuthorizers> {
        self.services.get(service)
    }

    /// Authorizer definitions declared by a service
    pub fn definitions(&self, service: &ShapeId) -> Option<&AuthorizersTrait> {
        self.services.get(service).map(ServiceAuthorizers::definitions)
    }

    /// Indexed service ids in ascending order
    pub fn services(&self) -> impl Iterator<Item = &ShapeId> {
        self.services.keys()
    }

    /// Resolved entries of a service in ascending shape id order
    pub fn resolved<'a>(
        &'a self,
        service: &ShapeId,
    ) -> impl Iterator<Item = (&'a ShapeId, &'a str)> + 'a {
        self.services
            .get(service)
            .into_iter()
            .flat_map(|authorizers| authorizers.resolved())
    }

    /// Every resolved name that has no definition in its service
    ///
    /// Lookups are unaffected by dangling names; this only reports them.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        self.services
            .iter()
            .flat_map(|(service, authorizers)| {
                authorizers
                    .resolved()
                    .filter(|(_, name)| !authorizers.definitions.contains(name))
                    .map(move |(shape, name)| DanglingReference {
                        service: service.clone(),
                        shape: shape.clone(),
                        authorizer: name.to_string(),
                    })
            })
            .collect()
    }

    /// Non-service shapes carrying an authorizers table, ascending
    ///
    /// Only services declare definitions; tables elsewhere are ignored.
    pub fn ignored_definition_tables(&self) -> &[ShapeId] {
        &self.ignored_tables
    }

    /// Number of indexed services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
