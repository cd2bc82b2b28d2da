//! Plain-text synchronization into a Loro CRDT.
//!
//! This crate provides:
//! - `TextEdit`: the minimal single-region edit between two strings
//! - `Synchronizer` / `synchronize`: apply a whole new text to a replicated
//!   text container as one transaction
//! - `load_from_snapshot` / `load_from_updates`: build a live document from
//!   serialized Loro data
//! - `LoroTextBuffer`: Loro-backed document, `MemoryDocument`: in-memory one
//! - `CrdtDocument` / `ReplicatedText`: the capabilities a document needs to
//!   be synchronized

mod buffer;
mod config;
mod document;
mod edit;
mod error;
mod memory;
mod snapshot;
mod sync;

pub use buffer::{LoroTextBuffer, LoroTextRef};
pub use config::{MissingContainerPolicy, SyncConfig, TEXT_CONTAINER};
pub use document::{CrdtDocument, ReplicatedText};
pub use edit::{TextEdit, TextOp};
pub use error::{ConfigError, CrdtError};
pub use memory::{MemoryDocument, MemoryText, RecordedOp};
pub use snapshot::{load_from_snapshot, load_from_updates};
pub use sync::{Synchronizer, synchronize};

// Re-export Loro types that consumers need
pub use loro::{LoroDoc, Subscription, VersionVector};
