//! In-memory replicated text without merge semantics.
//!
//! Keeps a log of every transaction it receives, which makes it useful for
//! checking exactly which operations a synchronizer issued.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::document::{CrdtDocument, ReplicatedText};
use crate::edit::TextOp;
use crate::{CrdtError, TextEdit};

/// An operation recorded by [`MemoryText`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedOp {
    /// Chars removed.
    Delete { index: usize, len: usize },
    /// Text inserted.
    Insert { index: usize, text: String },
}

impl From<TextOp<'_>> for RecordedOp {
    fn from(op: TextOp<'_>) -> Self {
        match op {
            TextOp::Delete { index, len } => RecordedOp::Delete { index, len },
            TextOp::Insert { index, text } => RecordedOp::Insert {
                index,
                text: text.to_string(),
            },
        }
    }
}

#[derive(Default)]
struct TextState {
    content: String,
    transactions: Vec<Vec<RecordedOp>>,
}

/// Document with an explicit set of text containers.
///
/// Unlike Loro, a container only exists once created, so lookups of unknown
/// names return `None`.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    texts: Rc<RefCell<BTreeMap<SmolStr, MemoryText>>>,
}

impl MemoryDocument {
    /// Create a document with no containers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document with one container named `name` holding `content`.
    pub fn with_text(name: &str, content: &str) -> Self {
        let doc = Self::new();
        doc.get_or_create_text(name).state.borrow_mut().content = content.to_string();
        doc
    }

    /// Names of every container.
    pub fn container_names(&self) -> Vec<SmolStr> {
        self.texts.borrow().keys().cloned().collect()
    }
}

impl CrdtDocument for MemoryDocument {
    type Text = MemoryText;

    fn text(&self, name: &str) -> Option<MemoryText> {
        self.texts.borrow().get(name).cloned()
    }

    fn get_or_create_text(&self, name: &str) -> MemoryText {
        self.texts
            .borrow_mut()
            .entry(SmolStr::new(name))
            .or_default()
            .clone()
    }
}

/// Handle to a text container of a [`MemoryDocument`].
#[derive(Clone, Default)]
pub struct MemoryText {
    state: Rc<RefCell<TextState>>,
}

impl MemoryText {
    /// Every transaction applied so far, oldest first.
    pub fn transactions(&self) -> Vec<Vec<RecordedOp>> {
        self.state.borrow().transactions.clone()
    }

    /// Number of transactions applied so far.
    pub fn transaction_count(&self) -> usize {
        self.state.borrow().transactions.len()
    }
}

impl ReplicatedText for MemoryText {
    fn materialize(&self) -> String {
        self.state.borrow().content.clone()
    }

    fn transact(&self, edit: &TextEdit) -> Result<(), CrdtError> {
        let mut state = self.state.borrow_mut();

        edit.check_bounds(state.content.chars().count())?;

        state.content = edit.apply_to(&state.content);
        state
            .transactions
            .push(edit.ops().into_iter().map(RecordedOp::from).collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_container_is_none() {
        let doc = MemoryDocument::new();
        assert!(doc.text("text").is_none());

        doc.get_or_create_text("text");
        assert!(doc.text("text").is_some());
        assert_eq!(doc.container_names(), vec![SmolStr::new("text")]);
    }

    #[test]
    fn test_handles_share_state() {
        let doc = MemoryDocument::with_text("text", "abc");
        let a = doc.text("text").unwrap();
        let b = doc.text("text").unwrap();

        a.transact(&TextEdit {
            index: 3,
            delete_len: 0,
            insert: "d".into(),
        })
        .unwrap();

        assert_eq!(b.materialize(), "abcd");
        assert_eq!(b.transaction_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_not_recorded() {
        let doc = MemoryDocument::with_text("text", "abc");
        let text = doc.text("text").unwrap();

        let result = text.transact(&TextEdit {
            index: 1,
            delete_len: 3,
            insert: String::new(),
        });

        assert!(result.is_err());
        assert_eq!(text.materialize(), "abc");
        assert_eq!(text.transaction_count(), 0);
    }

    #[test]
    fn test_huge_index_is_rejected() {
        let doc = MemoryDocument::with_text("text", "abc");
        let text = doc.text("text").unwrap();

        let err = text
            .transact(&TextEdit {
                index: usize::MAX,
                delete_len: 1,
                insert: String::new(),
            })
            .unwrap_err();

        assert!(matches!(err, CrdtError::OutOfBounds { text_len: 3, .. }));
        assert_eq!(text.materialize(), "abc");
        assert_eq!(text.transaction_count(), 0);
    }
}
