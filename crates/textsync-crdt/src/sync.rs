//! Whole-string synchronization into a replicated text.
//!
//! A form field or file hands us the full new text; the CRDT wants positional
//! operations. [`Synchronizer`] bridges the two by diffing against the current
//! materialized text and applying only the changed region, so characters
//! outside it keep their CRDT identity and still merge with concurrent remote
//! edits.

use crate::document::{CrdtDocument, ReplicatedText};
use crate::{CrdtError, MissingContainerPolicy, SyncConfig, TextEdit};

/// Applies whole-text updates to a document's text container.
#[derive(Clone, Debug, Default)]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer with the given config.
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// The active config.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Make the configured container's text equal `new_text`.
    ///
    /// Returns the applied edit, or `None` if the text already matched, in
    /// which case nothing was sent to the document.
    pub fn synchronize<D>(&self, doc: &D, new_text: &str) -> Result<Option<TextEdit>, CrdtError>
    where
        D: CrdtDocument + ?Sized,
    {
        let name = self.config.container.as_str();
        let text = match self.config.missing_container {
            MissingContainerPolicy::Fail => {
                doc.text(name).ok_or_else(|| CrdtError::MissingContainer {
                    name: self.config.container.clone(),
                })?
            }
            MissingContainerPolicy::Create => doc.get_or_create_text(name),
        };

        let current = text.materialize();
        let Some(edit) = TextEdit::between(&current, new_text) else {
            tracing::trace!(container = name, "text unchanged, skipping sync");
            return Ok(None);
        };

        text.transact(&edit)?;

        tracing::debug!(
            container = name,
            index = edit.index,
            deleted = edit.delete_len,
            inserted = edit.insert_len(),
            "applied text edit"
        );

        Ok(Some(edit))
    }
}

/// Synchronize the `"text"` container of `doc` to `new_text` using the
/// default config.
pub fn synchronize<D>(doc: &D, new_text: &str) -> Result<Option<TextEdit>, CrdtError>
where
    D: CrdtDocument + ?Sized,
{
    Synchronizer::default().synchronize(doc, new_text)
}
