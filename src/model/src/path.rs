//! Binding path enumeration
//!
//! Paths run from a root shape (usually a service) through resource
//! containment and lifecycle bindings to every shape matching a target
//! predicate. Only service, resource and operation shapes ever appear in
//! a path.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use crate::error::{ModelError, Result};
use crate::model::{Model, ShapeGraph};
use crate::shape::{RelationshipKind, Shape};
use crate::shape_id::ShapeId;

/// Ordered, root-inclusive, target-inclusive sequence of shape ids
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    shapes: Vec<ShapeId>,
}

impl Path {
    pub fn new(shapes: Vec<ShapeId>) -> Self {
        Self { shapes }
    }

    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    pub fn root(&self) -> Option<&ShapeId> {
        self.shapes.first()
    }

    pub fn target(&self) -> Option<&ShapeId> {
        self.shapes.last()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShapeId> {
        self.shapes.iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a ShapeId;
    type IntoIter = std::slice::Iter<'a, ShapeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.shapes.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" -> "))
    }
}

/// Enumerates every binding path from a root to matching shapes
///
/// Contract: the result is finite, covers every matching shape reachable
/// from `root`, and each path holds only service, resource and operation
/// shapes.
pub trait PathEnumerator {
    fn search(&self, root: &ShapeId, target: &dyn Fn(&Shape) -> bool) -> Result<Vec<Path>>;
}

/// Petgraph-backed [`PathEnumerator`] over a [`Model`]
///
/// Paths are produced depth-first with children visited in ascending
/// shape id order, so the same model always yields the same path order.
pub struct PathFinder<'m> {
    model: &'m Model,
    graph: DiGraph<ShapeId, RelationshipKind>,
    node_indices: HashMap<ShapeId, NodeIndex>,
}

impl<'m> PathFinder<'m> {
    /// Builds the binding graph of a model
    ///
    /// # Errors
    ///
    /// Returns `ModelError::CycleDetected` if binding relationships form
    /// a cycle, since path enumeration would not terminate.
    pub fn new(model: &'m Model) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for shape in model.shapes().filter(|s| s.kind().is_bindable()) {
            let idx = graph.add_node(shape.id().clone());
            node_indices.insert(shape.id().clone(), idx);
        }

        for shape in model.shapes().filter(|s| s.kind().is_bindable()) {
            let from = node_indices[shape.id()];
            for rel in shape.bindings() {
                let to = *node_indices
                    .get(&rel.target)
                    .ok_or_else(|| ModelError::UnknownShape(rel.target.clone()))?;
                graph.add_edge(from, to, rel.kind);
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(ModelError::CycleDetected(graph[cycle.node_id()].clone()));
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built binding graph"
        );

        Ok(Self {
            model,
            graph,
            node_indices,
        })
    }

    /// Distinct binding children of a node, ascending by shape id
    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        children.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        children.dedup();
        children
    }

    fn walk(
        &self,
        node: NodeIndex,
        target: &dyn Fn(&Shape) -> bool,
        stack: &mut Vec<NodeIndex>,
        paths: &mut Vec<Path>,
    ) -> Result<()> {
        stack.push(node);

        let id = &self.graph[node];
        let shape = self
            .model
            .shape(id)
            .ok_or_else(|| ModelError::UnknownShape(id.clone()))?;

        if target(shape) {
            paths.push(Path::new(
                stack.iter().map(|idx| self.graph[*idx].clone()).collect(),
            ));
        }

        for child in self.children(node) {
            self.walk(child, target, stack, paths)?;
        }

        stack.pop();
        Ok(())
    }
}

impl PathEnumerator for PathFinder<'_> {
    fn search(&self, root: &ShapeId, target: &dyn Fn(&Shape) -> bool) -> Result<Vec<Path>> {
        if !self.model.contains(root) {
            return Err(ModelError::UnknownShape(root.clone()));
        }

        let Some(&start) = self.node_indices.get(root) else {
            return Ok(Vec::new());
        };

        let mut paths = Vec::new();
        self.walk(start, target, &mut Vec::new(), &mut paths)?;

        tracing::trace!(root = %root, paths = paths.len(), "Enumerated binding paths");
        Ok(paths)
    }
}
