//! Shapes, their kinds, trait attachments and relationships

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::shape_id::ShapeId;

/// Kind tag of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Service,
    Resource,
    Operation,
    /// Structures, members, simple types and anything else that never
    /// takes part in authorizer resolution
    Other,
}

impl ShapeKind {
    /// Whether shapes of this kind appear in binding paths
    pub fn is_bindable(self) -> bool {
        matches!(self, Self::Service | Self::Resource | Self::Operation)
    }
}

/// Kind of a directed relationship between two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Service or resource contains an operation
    Operation,
    /// Service or resource contains a resource
    Resource,
    Create,
    Put,
    Read,
    Update,
    Delete,
    List,
    /// Operation bound to a resource collection rather than an instance
    CollectionOperation,
    Input,
    Output,
    Error,
    Member,
}

impl RelationshipKind {
    /// Containment and lifecycle relationships; the only ones followed
    /// when enumerating paths from a service
    pub fn is_binding(self) -> bool {
        !matches!(self, Self::Input | Self::Output | Self::Error | Self::Member)
    }

    /// Target kind a binding relationship must point at
    pub fn binding_target(self) -> Option<ShapeKind> {
        match self {
            Self::Resource => Some(ShapeKind::Resource),
            Self::Input | Self::Output | Self::Error | Self::Member => None,
            _ => Some(ShapeKind::Operation),
        }
    }
}

/// Outgoing edge of a shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub target: ShapeId,
}

/// Typed view of a trait value attached to shapes
///
/// Implementors name the trait through [`ShapeTrait::ID`] and decode
/// from the raw JSON value stored on the shape.
pub trait ShapeTrait: Serialize + DeserializeOwned {
    /// Absolute id of the trait, e.g. `aws.apigateway#authorizer`
    const ID: &'static str;
}

/// A node of the model graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    #[serde(default)]
    traits: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            traits: BTreeMap::new(),
            relationships: Vec::new(),
        }
    }

    pub fn service(id: ShapeId) -> Self {
        Self::new(id, ShapeKind::Service)
    }

    pub fn resource(id: ShapeId) -> Self {
        Self::new(id, ShapeKind::Resource)
    }

    pub fn operation(id: ShapeId) -> Self {
        Self::new(id, ShapeKind::Operation)
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn is_operation(&self) -> bool {
        self.kind == ShapeKind::Operation
    }

    /// Attaches a raw trait value, replacing any previous value
    pub fn with_trait(mut self, trait_id: impl Into<String>, value: serde_json::Value) -> Self {
        self.traits.insert(trait_id.into(), value);
        self
    }

    /// Attaches a typed trait value
    pub fn with_typed_trait<T: ShapeTrait>(self, value: &T) -> Result<Self> {
        let raw = serde_json::to_value(value).map_err(|e| ModelError::InvalidTrait {
            shape: self.id.clone(),
            trait_id: T::ID.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.with_trait(T::ID, raw))
    }

    /// Adds an outgoing relationship
    pub fn with_relationship(mut self, kind: RelationshipKind, target: ShapeId) -> Self {
        self.relationships.push(Relationship { kind, target });
        self
    }

    pub fn has_trait<T: ShapeTrait>(&self) -> bool {
        self.traits.contains_key(T::ID)
    }

    /// Decodes a typed trait value
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidTrait` if the stored value does not
    /// decode as `T`.
    pub fn get_trait<T: ShapeTrait>(&self) -> Result<Option<T>> {
        self.traits
            .get(T::ID)
            .map(|raw| {
                T::deserialize(raw).map_err(|e| ModelError::InvalidTrait {
                    shape: self.id.clone(),
                    trait_id: T::ID.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Relationships followed when enumerating binding paths
    pub fn bindings(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| r.kind.is_binding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Documentation(String);

    impl ShapeTrait for Documentation {
        const ID: &'static str = "smithy.api#documentation";
    }

    fn id(raw: &str) -> ShapeId {
        raw.parse().unwrap()
    }

    #[test]
    fn test_typed_trait_access() {
        let shape = Shape::operation(id("ns#GetThing"))
            .with_typed_trait(&Documentation("Gets a thing".to_string()))
            .unwrap();

        assert!(shape.has_trait::<Documentation>());
        assert_eq!(
            shape.get_trait::<Documentation>().unwrap(),
            Some(Documentation("Gets a thing".to_string()))
        );
    }

    #[test]
    fn test_missing_trait_is_none() {
        let shape = Shape::resource(id("ns#Thing"));
        assert!(!shape.has_trait::<Documentation>());
        assert_eq!(shape.get_trait::<Documentation>().unwrap(), None);
    }

    #[test]
    fn test_undecodable_trait_is_an_error() {
        let shape = Shape::operation(id("ns#GetThing"))
            .with_trait(Documentation::ID, json!({"not": "a string"}));

        let err = shape.get_trait::<Documentation>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidTrait { .. }));
        assert!(err.to_string().contains("smithy.api#documentation"));
    }

    #[test]
    fn test_bindings_skip_structural_relationships() {
        let shape = Shape::service(id("ns#Svc"))
            .with_relationship(RelationshipKind::Operation, id("ns#A"))
            .with_relationship(RelationshipKind::Input, id("ns#AInput"))
            .with_relationship(RelationshipKind::Read, id("ns#B"));

        let targets: Vec<_> = shape.bindings().map(|r| r.target.name()).collect();
        assert_eq!(targets, vec!["A", "B"]);
    }

    #[test]
    fn test_binding_targets() {
        assert_eq!(RelationshipKind::Resource.binding_target(), Some(ShapeKind::Resource));
        assert_eq!(RelationshipKind::Delete.binding_target(), Some(ShapeKind::Operation));
        assert_eq!(RelationshipKind::Member.binding_target(), None);
        assert!(!ShapeKind::Other.is_bindable());
    }
}
