//! Immutable shape model and its validating builder

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::shape::{Shape, ShapeKind};
use crate::shape_id::ShapeId;

/// Read access to the shapes of a model graph
///
/// This is the seam consumers are written against; [`Model`] is the
/// in-memory implementation.
pub trait ShapeGraph {
    /// Every shape of the given kind, in ascending id order
    fn shapes_of_kind(&self, kind: ShapeKind) -> Vec<&Shape>;

    /// Looks up a shape by id
    fn shape(&self, id: &ShapeId) -> Option<&Shape>;
}

/// Immutable snapshot of a shape graph
///
/// Built through [`ModelBuilder`], which guarantees unique ids, resolvable
/// relationship targets and well-formed bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// All shapes in ascending id order
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }
}

impl ShapeGraph for Model {
    fn shapes_of_kind(&self, kind: ShapeKind) -> Vec<&Shape> {
        self.shapes.values().filter(|s| s.kind() == kind).collect()
    }

    fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }
}

/// Collects shapes and validates them into a [`Model`]
///
/// # Example
///
/// ```
/// use gatekeep_model::{Model, RelationshipKind, Shape, ShapeGraph, ShapeId, ShapeKind};
///
/// let svc: ShapeId = "ns#Svc".parse()?;
/// let op: ShapeId = "ns#Ping".parse()?;
///
/// let mut builder = Model::builder();
/// builder.add_shape(Shape::service(svc).with_relationship(RelationshipKind::Operation, op.clone()))?;
/// builder.add_shape(Shape::operation(op))?;
/// let model = builder.build()?;
///
/// assert_eq!(model.shapes_of_kind(ShapeKind::Operation).len(), 1);
/// # Ok::<(), gatekeep_model::ModelError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
        }
    }

    /// Adds a shape
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DuplicateShape` if a shape with the same id
    /// was already added.
    pub fn add_shape(&mut self, shape: Shape) -> Result<&mut Self> {
        if self.shapes.contains_key(shape.id()) {
            return Err(ModelError::DuplicateShape(shape.id().clone()));
        }
        self.shapes.insert(shape.id().clone(), shape);
        Ok(self)
    }

    /// Adds several shapes, stopping at the first duplicate
    pub fn add_shapes(&mut self, shapes: impl IntoIterator<Item = Shape>) -> Result<&mut Self> {
        for shape in shapes {
            self.add_shape(shape)?;
        }
        Ok(self)
    }

    /// Validates relationships and freezes the model
    ///
    /// # Errors
    ///
    /// - `ModelError::UnknownShape` if a relationship targets a missing shape
    /// - `ModelError::InvalidBinding` if a binding relationship leaves a
    ///   shape that is not a service or resource, or points at a shape of
    ///   the wrong kind
    pub fn build(self) -> Result<Model> {
        for shape in self.shapes.values() {
            for rel in shape.relationships() {
                let target = self
                    .shapes
                    .get(&rel.target)
                    .ok_or_else(|| ModelError::UnknownShape(rel.target.clone()))?;

                let Some(expected) = rel.kind.binding_target() else {
                    continue;
                };

                let from_container = matches!(shape.kind(), ShapeKind::Service | ShapeKind::Resource);
                if !from_container || target.kind() != expected {
                    return Err(ModelError::InvalidBinding {
                        relationship: rel.kind,
                        from: shape.id().clone(),
                        from_kind: shape.kind(),
                        to: target.id().clone(),
                        to_kind: target.kind(),
                    });
                }
            }
        }

        tracing::debug!(shapes = self.shapes.len(), "Built shape model");

        Ok(Model {
            shapes: self.shapes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::RelationshipKind;

    fn id(raw: &str) -> ShapeId {
        raw.parse().unwrap()
    }

    #[test]
    fn test_empty_model() {
        let model = Model::builder().build().unwrap();
        assert!(model.is_empty());
        assert!(model.shapes_of_kind(ShapeKind::Service).is_empty());
    }

    #[test]
    fn test_duplicate_shape() {
        let mut builder = Model::builder();
        builder.add_shape(Shape::service(id("ns#Svc"))).unwrap();

        let result = builder.add_shape(Shape::resource(id("ns#Svc")));
        assert!(matches!(result, Err(ModelError::DuplicateShape(_))));
    }

    #[test]
    fn test_unknown_relationship_target() {
        let mut builder = Model::builder();
        builder
            .add_shape(
                Shape::service(id("ns#Svc"))
                    .with_relationship(RelationshipKind::Operation, id("ns#Missing")),
            )
            .unwrap();

        let result = builder.build();
        assert_eq!(result.unwrap_err(), ModelError::UnknownShape(id("ns#Missing")));
    }

    #[test]
    fn test_binding_to_wrong_kind() {
        let mut builder = Model::builder();
        builder
            .add_shapes(vec![
                Shape::service(id("ns#Svc"))
                    .with_relationship(RelationshipKind::Resource, id("ns#Op")),
                Shape::operation(id("ns#Op")),
            ])
            .unwrap();

        assert!(matches!(builder.build(), Err(ModelError::InvalidBinding { .. })));
    }

    #[test]
    fn test_binding_from_operation_is_rejected() {
        let mut builder = Model::builder();
        builder
            .add_shapes(vec![
                Shape::operation(id("ns#A"))
                    .with_relationship(RelationshipKind::Operation, id("ns#B")),
                Shape::operation(id("ns#B")),
            ])
            .unwrap();

        assert!(matches!(builder.build(), Err(ModelError::InvalidBinding { .. })));
    }

    #[test]
    fn test_structural_relationships_are_not_bindings() {
        let mut builder = Model::builder();
        builder
            .add_shapes(vec![
                Shape::operation(id("ns#Op"))
                    .with_relationship(RelationshipKind::Input, id("ns#OpInput")),
                Shape::new(id("ns#OpInput"), ShapeKind::Other),
            ])
            .unwrap();

        let model = builder.build().unwrap();
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn test_shapes_of_kind_are_sorted() {
        let mut builder = Model::builder();
        builder
            .add_shapes(vec![
                Shape::service(id("ns#Zeta")),
                Shape::service(id("ns#Alpha")),
                Shape::operation(id("ns#Op")),
            ])
            .unwrap();
        let model = builder.build().unwrap();

        let names: Vec<_> = model
            .shapes_of_kind(ShapeKind::Service)
            .into_iter()
            .map(|s| s.id().name().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert!(model.shape(&id("ns#Op")).is_some());
        assert!(model.contains(&id("ns#Alpha")));
    }
}
