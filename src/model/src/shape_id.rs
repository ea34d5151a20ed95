//! Absolute shape identifiers
//!
//! A shape id has the form `namespace#Name` with an optional member
//! suffix, `namespace#Name$member`. The namespace is one or more
//! dot-separated identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Globally unique identifier of a shape
///
/// Equality, hashing and ordering are by value, so ids can key ordered
/// maps and give a stable iteration order.
///
/// # Examples
///
/// ```
/// use gatekeep_model::ShapeId;
///
/// let id: ShapeId = "example.weather#GetForecast".parse().unwrap();
/// assert_eq!(id.namespace(), "example.weather");
/// assert_eq!(id.name(), "GetForecast");
/// assert_eq!(id.member(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId {
    namespace: String,
    name: String,
    member: Option<String>,
}

impl ShapeId {
    /// Creates a shape id from its parts, validating each of them
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();
        let raw = format!("{}#{}", namespace, name);

        if namespace.is_empty() || !namespace.split('.').all(is_identifier) {
            return Err(invalid(&raw, "namespace must be dot-separated identifiers"));
        }
        if !is_identifier(&name) {
            return Err(invalid(&raw, "name must be an identifier"));
        }

        Ok(Self {
            namespace,
            name,
            member: None,
        })
    }

    /// Returns a copy of this id pointing at the given member
    pub fn with_member(&self, member: impl Into<String>) -> Result<Self> {
        let member = member.into();
        if !is_identifier(&member) {
            return Err(invalid(
                &format!("{}${}", self, member),
                "member must be an identifier",
            ));
        }

        Ok(Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: Some(member),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Returns the id without its member part
    pub fn without_member(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            member: None,
        }
    }
}

impl FromStr for ShapeId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let (namespace, rest) = s
            .split_once('#')
            .ok_or_else(|| invalid(s, "missing '#' between namespace and name"))?;

        match rest.split_once('$') {
            Some((name, member)) => Self::new(namespace, name)?.with_member(member),
            None => Self::new(namespace, rest),
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.name)?;
        if let Some(member) = &self.member {
            write!(f, "${}", member)?;
        }
        Ok(())
    }
}

impl Serialize for ShapeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn invalid(id: &str, reason: &str) -> ModelError {
    ModelError::InvalidShapeId {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_and_display() {
        let id: ShapeId = "example.weather#City$cityId".parse().unwrap();
        assert_eq!(id.namespace(), "example.weather");
        assert_eq!(id.name(), "City");
        assert_eq!(id.member(), Some("cityId"));
        assert_eq!(id.to_string(), "example.weather#City$cityId");
        assert_eq!(id.without_member().to_string(), "example.weather#City");
    }

    #[test_case("noHash" ; "missing hash")]
    #[test_case("#Name" ; "empty namespace")]
    #[test_case("ns..inner#Name" ; "empty namespace segment")]
    #[test_case("ns#" ; "empty name")]
    #[test_case("ns#1Name" ; "name starts with digit")]
    #[test_case("ns#Name$" ; "empty member")]
    #[test_case("ns#Na-me" ; "invalid character")]
    fn test_rejects_malformed(raw: &str) {
        let result = raw.parse::<ShapeId>();
        assert!(matches!(result, Err(ModelError::InvalidShapeId { .. })));
    }

    #[test]
    fn test_ordering_is_by_value() {
        let a: ShapeId = "ns#A".parse().unwrap();
        let b: ShapeId = "ns#B".parse().unwrap();
        let a_member = a.with_member("m").unwrap();

        assert!(a < b);
        assert!(a < a_member);
        assert_eq!(a, "ns#A".parse::<ShapeId>().unwrap());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let id: ShapeId = "ns#Service".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns#Service\"");

        let back: ShapeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ShapeId>("\"bogus\"").is_err());
    }
}
