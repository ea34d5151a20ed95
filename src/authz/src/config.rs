//! Index build configuration

use serde::{Deserialize, Serialize};

/// What to do when two binding paths resolve one shape differently
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// The path enumerated last wins
    #[default]
    LastWriteWins,
    /// Fail the build with `AuthzError::DivergentResolution`
    Reject,
}

/// Configuration for building an [`AuthorizerIndex`](crate::AuthorizerIndex)
///
/// # Examples
///
/// ```
/// use gatekeep_authz::{ConflictPolicy, IndexConfig};
///
/// let config = IndexConfig::from_json_str(r#"{"conflict_policy": "reject"}"#).unwrap();
/// assert_eq!(config.conflict_policy, ConflictPolicy::Reject);
///
/// let config = IndexConfig::from_json_str("{}").unwrap();
/// assert_eq!(config, IndexConfig::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Policy for diamond-shaped bindings that disagree
    pub conflict_policy: ConflictPolicy,
}

impl IndexConfig {
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Parses a configuration from JSON; absent fields take their defaults
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
