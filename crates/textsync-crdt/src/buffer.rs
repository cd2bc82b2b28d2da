//! Loro-backed replicated document.

use std::borrow::Cow;

use loro::{ExportMode, LoroDoc, LoroText, Subscription, VersionVector};

use crate::document::{CrdtDocument, ReplicatedText};
use crate::edit::TextOp;
use crate::{CrdtError, TEXT_CONTAINER, TextEdit};

/// Loro document holding one or more text containers.
///
/// Cloning is cheap and yields another handle to the same document.
#[derive(Clone)]
pub struct LoroTextBuffer {
    doc: LoroDoc,
}

impl LoroTextBuffer {
    /// Create a new empty document with a `"text"` container.
    pub fn new() -> Self {
        let doc = LoroDoc::new();
        doc.get_text(TEXT_CONTAINER);
        Self { doc }
    }

    /// Create a document whose `"text"` container starts with `content`.
    pub fn with_text(content: &str) -> Result<Self, CrdtError> {
        let buffer = Self::new();
        if !content.is_empty() {
            buffer.doc.get_text(TEXT_CONTAINER).insert(0, content)?;
            buffer.doc.commit();
        }
        Ok(buffer)
    }

    /// Wrap an existing Loro document.
    pub fn from_doc(doc: LoroDoc) -> Self {
        Self { doc }
    }

    /// Get the underlying Loro document.
    pub fn doc(&self) -> &LoroDoc {
        &self.doc
    }

    /// Handle to the `"text"` container.
    pub fn text_handle(&self) -> LoroTextRef {
        self.container(TEXT_CONTAINER)
    }

    fn container(&self, name: &str) -> LoroTextRef {
        LoroTextRef {
            doc: self.doc.clone(),
            text: self.doc.get_text(name),
        }
    }

    /// Materialized content of the `"text"` container.
    pub fn content(&self) -> String {
        self.doc.get_text(TEXT_CONTAINER).to_string()
    }

    /// Export full snapshot.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, CrdtError> {
        self.doc
            .export(ExportMode::Snapshot)
            .map_err(|e| CrdtError::Export(e.to_string()))
    }

    /// Export every update in the oplog.
    pub fn export_updates(&self) -> Result<Vec<u8>, CrdtError> {
        self.doc
            .export(ExportMode::all_updates())
            .map_err(|e| CrdtError::Export(e.to_string()))
    }

    /// Export updates since given version. Returns `None` if there are none.
    pub fn export_updates_since(
        &self,
        version: &VersionVector,
    ) -> Result<Option<Vec<u8>>, CrdtError> {
        if *version == self.doc.oplog_vv() {
            return Ok(None);
        }

        let updates = self
            .doc
            .export(ExportMode::Updates {
                from: Cow::Owned(version.clone()),
            })
            .map_err(|e| CrdtError::Export(e.to_string()))?;

        if updates.is_empty() {
            return Ok(None);
        }

        Ok(Some(updates))
    }

    /// Import remote changes.
    ///
    /// Updates that arrive before their dependencies are kept by Loro and
    /// applied once the missing history is imported.
    pub fn import(&self, data: &[u8]) -> Result<(), CrdtError> {
        let status = self
            .doc
            .import(data)
            .map_err(|e| CrdtError::Decode(e.to_string()))?;
        if let Some(pending) = status.pending {
            tracing::debug!(?pending, "imported updates waiting on dependencies");
        }
        Ok(())
    }

    /// Get current version vector.
    pub fn version(&self) -> VersionVector {
        self.doc.oplog_vv()
    }

    /// Call `callback` with the encoded update of every local transaction.
    ///
    /// The callback runs once per committed transaction. Dropping the
    /// returned [`Subscription`] unsubscribes.
    pub fn subscribe_local_updates<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.doc.subscribe_local_update(Box::new(move |update| {
            callback(update);
            true
        }))
    }
}

impl Default for LoroTextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CrdtDocument for LoroTextBuffer {
    type Text = LoroTextRef;

    /// Loro root containers exist as soon as they are named, so this never
    /// returns `None`.
    fn text(&self, name: &str) -> Option<LoroTextRef> {
        Some(self.container(name))
    }

    fn get_or_create_text(&self, name: &str) -> LoroTextRef {
        self.container(name)
    }
}

/// Handle to one text container of a [`LoroTextBuffer`].
#[derive(Clone)]
pub struct LoroTextRef {
    doc: LoroDoc,
    text: LoroText,
}

impl LoroTextRef {
    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.text.len_unicode()
    }
}

impl ReplicatedText for LoroTextRef {
    fn materialize(&self) -> String {
        self.text.to_string()
    }

    fn transact(&self, edit: &TextEdit) -> Result<(), CrdtError> {
        // Anything the caller left uncommitted goes into its own change.
        self.doc.commit();

        edit.check_bounds(self.text.len_unicode())?;

        for op in edit.ops() {
            match op {
                TextOp::Delete { index, len } => self.text.delete(index, len)?,
                TextOp::Insert { index, text } => self.text.insert(index, text)?,
            }
        }

        self.doc.commit();
        Ok(())
    }
}
