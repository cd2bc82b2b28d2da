//! Capability traits for replicated documents and their text containers.
//!
//! The synchronizer only needs to read a container's materialized text and to
//! apply one edit as a single transaction. Any CRDT exposing those two
//! capabilities can be synchronized; [`LoroTextBuffer`](crate::LoroTextBuffer)
//! and [`MemoryDocument`](crate::MemoryDocument) are the provided ones.

use crate::{CrdtError, TextEdit};

/// A replicated text container.
pub trait ReplicatedText {
    /// The current text, with every applied and merged operation included.
    fn materialize(&self) -> String;

    /// Apply `edit` (delete, then insert) as one transaction.
    ///
    /// Observers of the document must see the delete and insert as a single
    /// change, never the state in between.
    fn transact(&self, edit: &TextEdit) -> Result<(), CrdtError>;
}

/// A document owning named text containers.
pub trait CrdtDocument {
    /// Text container handle type.
    type Text: ReplicatedText;

    /// Look up an existing text container.
    fn text(&self, name: &str) -> Option<Self::Text>;

    /// Look up a text container, creating it empty if absent.
    fn get_or_create_text(&self, name: &str) -> Self::Text;
}
