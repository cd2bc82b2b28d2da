//! Synchronizer configuration.
//!
//! Config can be built in code, deserialized with serde, or read from a small
//! KDL document:
//!
//! ```kdl
//! container "text"
//! missing-container "create"
//! ```

use std::str::FromStr;

use kdl::KdlDocument;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;

/// Name of the text container a document keeps its content in.
pub const TEXT_CONTAINER: &str = "text";

/// What to do when a document has no container under the configured name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingContainerPolicy {
    /// Report [`CrdtError::MissingContainer`](crate::CrdtError::MissingContainer).
    #[default]
    Fail,
    /// Create the container empty, then synchronize into it.
    Create,
}

impl FromStr for MissingContainerPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "create" => Ok(Self::Create),
            _ => Err(ConfigError::InvalidValue {
                node: "missing-container",
                expected: "\"fail\" or \"create\"",
            }),
        }
    }
}

/// Configuration for a [`Synchronizer`](crate::Synchronizer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SyncConfig {
    /// Name of the text container to synchronize.
    pub container: SmolStr,
    /// Behaviour when the container does not exist.
    pub missing_container: MissingContainerPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            container: SmolStr::new_static(TEXT_CONTAINER),
            missing_container: MissingContainerPolicy::Fail,
        }
    }
}

impl SyncConfig {
    /// Create the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different container name.
    pub fn with_container(mut self, container: impl Into<SmolStr>) -> Self {
        self.container = container.into();
        self
    }

    /// Set the missing-container policy.
    pub fn with_missing_container(mut self, policy: MissingContainerPolicy) -> Self {
        self.missing_container = policy;
        self
    }

    /// Parse config from a KDL document. Absent nodes keep their defaults.
    pub fn from_kdl(source: &str) -> Result<Self, ConfigError> {
        let doc: KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| ConfigError::Parse(e.to_string()))?;

        let mut config = Self::default();

        if let Some(node) = doc.get("container") {
            let name = node
                .entries()
                .first()
                .and_then(|entry| entry.value().as_string())
                .ok_or(ConfigError::InvalidValue {
                    node: "container",
                    expected: "a string",
                })?;
            config.container = SmolStr::new(name);
        }

        if let Some(node) = doc.get("missing-container") {
            let policy = node
                .entries()
                .first()
                .and_then(|entry| entry.value().as_string())
                .ok_or(ConfigError::InvalidValue {
                    node: "missing-container",
                    expected: "a string",
                })?;
            config.missing_container = policy.parse()?;
        }

        Ok(config)
    }
}
