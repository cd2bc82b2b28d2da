//! Building documents from serialized Loro data.
//!
//! Loading is all-or-nothing: bytes that fail to decode, or that decode to
//! operations whose history is missing, produce an error and no document.

use loro::{ImportStatus, LoroDoc};

use crate::{CrdtError, LoroTextBuffer};

/// Decode a snapshot (or a single update blob) into a new document.
pub fn load_from_snapshot(bytes: &[u8]) -> Result<LoroTextBuffer, CrdtError> {
    let doc = LoroDoc::new();
    let status = doc.import(bytes).map_err(|e| {
        tracing::warn!(len = bytes.len(), error = %e, "rejected snapshot");
        CrdtError::Decode(e.to_string())
    })?;
    ensure_complete(status)?;

    tracing::debug!(len = bytes.len(), "loaded document from snapshot");
    Ok(LoroTextBuffer::from_doc(doc))
}

/// Decode several update blobs, in any order, into a new document.
pub fn load_from_updates<B>(updates: &[B]) -> Result<LoroTextBuffer, CrdtError>
where
    B: AsRef<[u8]>,
{
    let batch: Vec<Vec<u8>> = updates.iter().map(|u| u.as_ref().to_vec()).collect();

    let doc = LoroDoc::new();
    let status = doc.import_batch(&batch).map_err(|e| {
        tracing::warn!(blobs = batch.len(), error = %e, "rejected update batch");
        CrdtError::Decode(e.to_string())
    })?;
    ensure_complete(status)?;

    tracing::debug!(blobs = batch.len(), "loaded document from updates");
    Ok(LoroTextBuffer::from_doc(doc))
}

fn ensure_complete(status: ImportStatus) -> Result<(), CrdtError> {
    match status.pending {
        Some(pending) => {
            tracing::warn!(?pending, "snapshot depends on missing history");
            Err(CrdtError::Incomplete(format!("{pending:?}")))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synchronize;

    #[test]
    fn test_snapshot_roundtrip() {
        let origin = LoroTextBuffer::with_text("shopping list").unwrap();
        synchronize(&origin, "shopping list: milk, eggs").unwrap();

        let loaded = load_from_snapshot(&origin.export_snapshot().unwrap()).unwrap();

        assert_eq!(loaded.content(), "shopping list: milk, eggs");
        assert_eq!(loaded.version(), origin.version());
    }

    #[test]
    fn test_empty_document_roundtrip() {
        let origin = LoroTextBuffer::new();

        let loaded = load_from_snapshot(&origin.export_snapshot().unwrap()).unwrap();

        assert_eq!(loaded.content(), "");
    }

    #[test]
    fn test_loaded_document_accepts_edits() {
        let origin = LoroTextBuffer::with_text("first draft").unwrap();
        let loaded = load_from_snapshot(&origin.export_snapshot().unwrap()).unwrap();

        let edit = synchronize(&loaded, "first final draft").unwrap().unwrap();

        assert_eq!(edit.index, 6);
        assert_eq!(loaded.content(), "first final draft");
        // The origin is independent.
        assert_eq!(origin.content(), "first draft");
    }

    #[test]
    fn test_update_blob_loads() {
        let origin = LoroTextBuffer::with_text("via updates").unwrap();

        let loaded = load_from_snapshot(&origin.export_updates().unwrap()).unwrap();

        assert_eq!(loaded.content(), "via updates");
    }

    #[test]
    fn test_load_from_update_batch() {
        let origin = LoroTextBuffer::with_text("one").unwrap();
        let v1 = origin.version();
        let first = origin.export_updates().unwrap();
        synchronize(&origin, "one two").unwrap();
        let second = origin.export_updates_since(&v1).unwrap().unwrap();

        let loaded = load_from_updates(&[second, first]).unwrap();

        assert_eq!(loaded.content(), "one two");
    }

    #[test]
    fn test_missing_history_is_incomplete() {
        let origin = LoroTextBuffer::with_text("base").unwrap();
        let v1 = origin.version();
        synchronize(&origin, "base extended").unwrap();
        let tail = origin.export_updates_since(&v1).unwrap().unwrap();

        let err = load_from_snapshot(&tail).err().unwrap();

        assert!(matches!(err, CrdtError::Incomplete(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = load_from_snapshot(b"definitely not a loro snapshot")
            .err()
            .unwrap();
        assert!(matches!(err, CrdtError::Decode(_)));
    }

    #[test]
    fn test_truncated_snapshot_is_decode_error() {
        let origin = LoroTextBuffer::with_text("some text worth keeping").unwrap();
        let snapshot = origin.export_snapshot().unwrap();

        let err = load_from_snapshot(&snapshot[..snapshot.len() / 2])
            .err()
            .unwrap();

        assert!(matches!(err, CrdtError::Decode(_)));
    }
}
