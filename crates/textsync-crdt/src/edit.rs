//! Minimal single-region edits between two strings.
//!
//! All offsets and lengths are in chars (Unicode scalar values), matching the
//! position unit of `LoroText::insert` and `LoroText::delete`.

use crate::CrdtError;

/// One contiguous replacement: delete `delete_len` chars at `index`, then
/// insert `insert` at the same offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    /// Char offset where the edit starts (length of the common prefix).
    pub index: usize,
    /// Number of chars removed from the current text.
    pub delete_len: usize,
    /// Text inserted in place of the removed chars.
    pub insert: String,
}

/// A single positional operation against a replicated text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextOp<'a> {
    /// Remove `len` chars starting at `index`.
    Delete { index: usize, len: usize },
    /// Insert `text` at `index`.
    Insert { index: usize, text: &'a str },
}

impl TextEdit {
    /// Compute the edit that turns `current` into `new`.
    ///
    /// Returns `None` when the texts are equal. Otherwise the edit covers the
    /// region between the longest common prefix and the longest common
    /// suffix. The suffix scan is bounded so it never reclaims chars already
    /// matched by the prefix: `"aaa"` to `"aa"` deletes the last `a`, not the
    /// first.
    pub fn between(current: &str, new: &str) -> Option<Self> {
        if current == new {
            return None;
        }

        let prefix = current
            .chars()
            .zip(new.chars())
            .take_while(|(a, b)| a == b)
            .count();

        let current_len = current.chars().count();
        let new_len = new.chars().count();
        let max_suffix = current_len.min(new_len) - prefix;

        let suffix = current
            .chars()
            .rev()
            .zip(new.chars().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        let insert = new
            .chars()
            .skip(prefix)
            .take(new_len - prefix - suffix)
            .collect();

        Some(Self {
            index: prefix,
            delete_len: current_len - prefix - suffix,
            insert,
        })
    }

    /// Number of chars inserted.
    pub fn insert_len(&self) -> usize {
        self.insert.chars().count()
    }

    /// Check that the deleted range lies within a text of `text_len` chars.
    pub fn check_bounds(&self, text_len: usize) -> Result<(), CrdtError> {
        let fits = self
            .index
            .checked_add(self.delete_len)
            .is_some_and(|end| end <= text_len);
        if fits {
            Ok(())
        } else {
            Err(CrdtError::OutOfBounds {
                index: self.index,
                len: self.delete_len,
                text_len,
            })
        }
    }

    /// The operations to issue, delete first. Zero-length deletes and empty
    /// inserts are left out.
    pub fn ops(&self) -> Vec<TextOp<'_>> {
        let mut ops = Vec::with_capacity(2);
        if self.delete_len > 0 {
            ops.push(TextOp::Delete {
                index: self.index,
                len: self.delete_len,
            });
        }
        if !self.insert.is_empty() {
            ops.push(TextOp::Insert {
                index: self.index,
                text: &self.insert,
            });
        }
        ops
    }

    /// Apply the edit to a plain string, as a reference for what a replicated
    /// text should materialize to afterwards.
    pub fn apply_to(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.insert.len());
        out.extend(text.chars().take(self.index));
        out.push_str(&self.insert);
        out.extend(text.chars().skip(self.index.saturating_add(self.delete_len)));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_texts_have_no_edit() {
        assert_eq!(TextEdit::between("same", "same"), None);
        assert_eq!(TextEdit::between("", ""), None);
    }

    #[test]
    fn test_insert_in_middle() {
        let edit = TextEdit::between("hello world", "hello there world").unwrap();
        insta::assert_debug_snapshot!(edit, @r#"
        TextEdit {
            index: 6,
            delete_len: 0,
            insert: "there ",
        }
        "#);
    }

    #[test]
    fn test_suffix_does_not_overlap_prefix() {
        let edit = TextEdit::between("aaa", "aa").unwrap();
        assert_eq!(edit.ops(), vec![TextOp::Delete { index: 2, len: 1 }]);
    }

    #[test]
    fn test_growth_of_repeated_chars() {
        let edit = TextEdit::between("aa", "aaaa").unwrap();
        assert_eq!(edit.index, 2);
        assert_eq!(edit.delete_len, 0);
        assert_eq!(edit.insert, "aa");
    }

    #[test]
    fn test_clear_is_delete_only() {
        let edit = TextEdit::between("hello", "").unwrap();
        assert_eq!(edit.ops(), vec![TextOp::Delete { index: 0, len: 5 }]);
    }

    #[test]
    fn test_fill_is_insert_only() {
        let edit = TextEdit::between("", "hello").unwrap();
        assert_eq!(
            edit.ops(),
            vec![TextOp::Insert {
                index: 0,
                text: "hello"
            }]
        );
    }

    #[test]
    fn test_total_replacement() {
        let edit = TextEdit::between("abc", "xyz").unwrap();
        insta::assert_debug_snapshot!(edit.ops(), @r#"
        [
            Delete {
                index: 0,
                len: 3,
            },
            Insert {
                index: 0,
                text: "xyz",
            },
        ]
        "#);
    }

    #[test]
    fn test_replace_word() {
        let edit = TextEdit::between("the quick fox", "the slow fox").unwrap();
        assert_eq!(edit.index, 4);
        assert_eq!(edit.delete_len, 5);
        assert_eq!(edit.insert, "slow");
    }

    #[test]
    fn test_offsets_are_chars_not_bytes() {
        let edit = TextEdit::between("héllo 🌍", "héllo wide 🌍").unwrap();
        assert_eq!(edit.index, 6);
        assert_eq!(edit.delete_len, 0);
        assert_eq!(edit.insert, "wide ");
        assert_eq!(edit.insert_len(), 5);
    }

    #[test]
    fn test_apply_to_reproduces_new_text() {
        let cases = [
            ("hello world", "hello there world"),
            ("aaa", "aa"),
            ("", "fresh"),
            ("stale", ""),
            ("abcdef", "abXYef"),
            ("🌍🌍", "🌍🌎🌍"),
        ];
        for (current, new) in cases {
            let edit = TextEdit::between(current, new).unwrap();
            assert_eq!(edit.apply_to(current), new, "{current:?} -> {new:?}");
            assert!(edit.check_bounds(current.chars().count()).is_ok());
        }
    }

    #[test]
    fn test_check_bounds_does_not_overflow() {
        let edit = TextEdit {
            index: usize::MAX,
            delete_len: 1,
            insert: String::new(),
        };
        assert!(matches!(
            edit.check_bounds(3),
            Err(CrdtError::OutOfBounds {
                index: usize::MAX,
                len: 1,
                text_len: 3
            })
        ));
    }

    #[test]
    fn test_check_bounds_allows_delete_to_end() {
        let edit = TextEdit {
            index: 1,
            delete_len: 2,
            insert: "x".into(),
        };
        assert!(edit.check_bounds(3).is_ok());
        assert!(edit.check_bounds(2).is_err());
    }
}
