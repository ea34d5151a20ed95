//! Path-walking construction of the authorizer index
//!
//! For every service the builder walks each binding path from the
//! service to an operation, carrying the nearest authorizer seen so far
//! and recording it for every shape on the path. Results go into a
//! scratch accumulator per service that is frozen only when the whole
//! model has been processed.

use std::collections::{BTreeMap, HashMap};

use gatekeep_model::{ModelError, PathEnumerator, Shape, ShapeGraph, ShapeId, ShapeKind};
use tracing::debug;

use super::ServiceAuthorizers;
use crate::config::{ConflictPolicy, IndexConfig};
use crate::error::{AuthzError, Result};
use crate::traits::{AuthorizerTrait, AuthorizersTrait};

/// Mutable per-service accumulator of resolved names
struct ResolvedScratch<'a> {
    service: &'a ShapeId,
    policy: ConflictPolicy,
    entries: BTreeMap<ShapeId, String>,
}

impl<'a> ResolvedScratch<'a> {
    fn new(service: &'a ShapeId, policy: ConflictPolicy) -> Self {
        Self {
            service,
            policy,
            entries: BTreeMap::new(),
        }
    }

    /// Records the resolved name of a shape, overwriting what an earlier
    /// path recorded unless the policy rejects divergence
    fn record(&mut self, shape: &ShapeId, name: &str) -> Result<()> {
        match self.entries.get_mut(shape) {
            Some(previous) if previous.as_str() == name => {}
            Some(previous) => {
                if self.policy == ConflictPolicy::Reject {
                    return Err(AuthzError::DivergentResolution {
                        service: self.service.clone(),
                        shape: shape.clone(),
                        previous: previous.clone(),
                        current: name.to_string(),
                    });
                }
                debug!(
                    service = %self.service,
                    shape = %shape,
                    previous = %previous,
                    current = name,
                    "Later binding path overrides resolved authorizer"
                );
                *previous = name.to_string();
            }
            None => {
                self.entries.insert(shape.clone(), name.to_string());
            }
        }
        Ok(())
    }
}

/// Frozen output of an [`IndexBuilder`]
pub(crate) struct BuiltIndex {
    pub(crate) services: BTreeMap<ShapeId, ServiceAuthorizers>,
    pub(crate) ignored_tables: Vec<ShapeId>,
}

/// One-shot builder over a shape graph and a path enumerator
pub(crate) struct IndexBuilder<'a, G: ?Sized, E: ?Sized> {
    graph: &'a G,
    paths: &'a E,
    config: &'a IndexConfig,
    own_authorizers: HashMap<ShapeId, Option<String>>,
}

impl<'a, G, E> IndexBuilder<'a, G, E>
where
    G: ShapeGraph + ?Sized,
    E: PathEnumerator + ?Sized,
{
    pub(crate) fn new(graph: &'a G, paths: &'a E, config: &'a IndexConfig) -> Self {
        Self {
            graph,
            paths,
            config,
            own_authorizers: HashMap::new(),
        }
    }

    pub(crate) fn build(mut self) -> Result<BuiltIndex> {
        let ignored_tables = self.ignored_tables();

        let graph = self.graph;
        let mut services = BTreeMap::new();
        for service in graph.shapes_of_kind(ShapeKind::Service) {
            let authorizers = self.build_service(service)?;
            services.insert(service.id().clone(), authorizers);
        }
        Ok(BuiltIndex {
            services,
            ignored_tables,
        })
    }

    fn build_service(&mut self, service: &Shape) -> Result<ServiceAuthorizers> {
        let graph = self.graph;
        let definitions = service.get_trait::<AuthorizersTrait>()?.unwrap_or_default();
        let mut scratch = ResolvedScratch::new(service.id(), self.config.conflict_policy);

        // A service without operations is never visited by a path.
        if let Some(name) = self.own_authorizer(service)? {
            scratch.record(service.id(), &name)?;
        }

        let paths = self.paths.search(service.id(), &|shape: &Shape| shape.is_operation())?;

        for path in &paths {
            let mut current: Option<String> = None;

            for id in path {
                let shape = graph
                    .shape(id)
                    .ok_or_else(|| ModelError::UnknownShape(id.clone()))?;
                if !shape.kind().is_bindable() {
                    continue;
                }

                if let Some(name) = self.own_authorizer(shape)? {
                    current = Some(name);
                }
                if let Some(name) = &current {
                    scratch.record(id, name)?;
                }
            }
        }

        debug!(
            service = %service.id(),
            paths = paths.len(),
            resolved = scratch.entries.len(),
            definitions = definitions.len(),
            "Resolved service authorizers"
        );

        Ok(ServiceAuthorizers {
            resolved: scratch.entries,
            definitions,
        })
    }

    /// Authorizer trait value attached directly to a shape, decoded once
    fn own_authorizer(&mut self, shape: &Shape) -> Result<Option<String>> {
        if let Some(cached) = self.own_authorizers.get(shape.id()) {
            return Ok(cached.clone());
        }

        let value = shape.get_trait::<AuthorizerTrait>()?.map(AuthorizerTrait::into_value);
        self.own_authorizers.insert(shape.id().clone(), value.clone());
        Ok(value)
    }

    /// Non-service shapes carrying an authorizers table, which is never read
    fn ignored_tables(&self) -> Vec<ShapeId> {
        let mut ignored = Vec::new();
        for kind in [ShapeKind::Resource, ShapeKind::Operation, ShapeKind::Other] {
            for shape in self.graph.shapes_of_kind(kind) {
                if shape.has_trait::<AuthorizersTrait>() {
                    debug!(shape = %shape.id(), kind = ?kind, "Ignoring authorizers table outside a service");
                    ignored.push(shape.id().clone());
                }
            }
        }
        ignored.sort();
        ignored
    }
}
