//! Authorizer trait definitions
//!
//! Two traits drive resolution:
//! - [`AuthorizerTrait`] names the authorizer that applies to a service,
//!   resource or operation and everything bound below it.
//! - [`AuthorizersTrait`] is the table of named authorizer definitions
//!   a service carries.

use gatekeep_model::ShapeTrait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the authorizer applied at a shape and below
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizerTrait(String);

impl AuthorizerTrait {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    pub fn into_value(self) -> String {
        self.0
    }
}

impl ShapeTrait for AuthorizerTrait {
    const ID: &'static str = "aws.apigateway#authorizer";
}

/// Named authorizer definitions of a service, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizersTrait(IndexMap<String, AuthorizerDefinition>);

impl AuthorizersTrait {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Adds or replaces a definition, keeping its original position
    pub fn with_authorizer(mut self, name: impl Into<String>, definition: AuthorizerDefinition) -> Self {
        self.0.insert(name.into(), definition);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AuthorizerDefinition> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorizerDefinition)> {
        self.0.iter().map(|(name, def)| (name.as_str(), def))
    }
}

impl ShapeTrait for AuthorizersTrait {
    const ID: &'static str = "aws.apigateway#authorizers";
}

impl FromIterator<(String, AuthorizerDefinition)> for AuthorizersTrait {
    fn from_iter<I: IntoIterator<Item = (String, AuthorizerDefinition)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Structured authorizer configuration
///
/// Resolution never looks inside a definition; the fields are typed for
/// the benefit of consumers. Unrecognized members are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerDefinition {
    /// Authentication scheme id the authorizer implements
    pub scheme: String,

    /// Authorizer type, `token` unless stated otherwise
    #[serde(rename = "type", default = "default_authorizer_type")]
    pub authorizer_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_auth_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_validation_expression: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ttl_in_seconds: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer_payload_format_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_simple_responses: Option<bool>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_authorizer_type() -> String {
    "token".to_string()
}

impl AuthorizerDefinition {
    /// Creates a token authorizer for the given scheme
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            authorizer_type: default_authorizer_type(),
            custom_auth_type: None,
            uri: None,
            credentials: None,
            identity_source: None,
            identity_validation_expression: None,
            result_ttl_in_seconds: None,
            authorizer_payload_format_version: None,
            enable_simple_responses: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_type(mut self, authorizer_type: impl Into<String>) -> Self {
        self.authorizer_type = authorizer_type.into();
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_identity_source(mut self, source: impl Into<String>) -> Self {
        self.identity_source = Some(source.into());
        self
    }

    pub fn with_result_ttl(mut self, seconds: i32) -> Self {
        self.result_ttl_in_seconds = Some(seconds);
        self
    }
}
