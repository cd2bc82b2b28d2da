//! Error types for CRDT text operations.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors that can occur while synchronizing or loading CRDT documents.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CrdtError {
    /// The document has no text container under the requested name.
    ///
    /// This is a caller contract violation and is never retried.
    #[error("document has no text container named {name:?}")]
    MissingContainer {
        /// Name of the container that was looked up.
        name: SmolStr,
    },

    /// Bytes are not a valid CRDT update encoding.
    #[error("failed to decode CRDT data: {0}")]
    Decode(String),

    /// Bytes decoded, but depend on operations the document does not have.
    #[error("CRDT data is incomplete: missing dependencies {0}")]
    Incomplete(String),

    /// Failed to export CRDT data.
    #[error("failed to export CRDT data: {0}")]
    Export(String),

    /// Edit does not fit the text it was applied to.
    #[error("edit out of bounds: {index}+{len} exceeds text length {text_len}")]
    OutOfBounds {
        /// Start of the rejected operation, in chars.
        index: usize,
        /// Length of the rejected operation, in chars.
        len: usize,
        /// Length of the text at the time, in chars.
        text_len: usize,
    },

    /// Loro CRDT error.
    #[error("loro error: {0}")]
    Loro(String),
}

impl From<loro::LoroError> for CrdtError {
    fn from(e: loro::LoroError) -> Self {
        CrdtError::Loro(e.to_string())
    }
}

/// Errors raised while reading a [`SyncConfig`](crate::SyncConfig).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// The config document could not be parsed.
    #[error("invalid config: {0}")]
    Parse(String),

    /// A node had a value of the wrong shape.
    #[error("config node `{node}` expects {expected}")]
    InvalidValue {
        /// Node name.
        node: &'static str,
        /// What the node should have held.
        expected: &'static str,
    },
}
