//! Saved documents.

use folio_doc::{BlockKind, DocumentId, StoreSnapshot, TypedId};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::kv::KvStore;

const DOC_PREFIX: &str = "doc:";

/// Longest title derived from content, in characters.
const TITLE_CHARS: usize = 80;

/// A document as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub title: String,
    pub updated_at: u64,
    pub snapshot: StoreSnapshot,
}

impl StoredDocument {
    /// Wrap a snapshot, deriving the title from its first heading (or first
    /// non-empty block).
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            title: derive_title(&snapshot),
            updated_at: folio_types::now_millis(),
            snapshot,
        }
    }
}

fn derive_title(snapshot: &StoreSnapshot) -> String {
    let source = snapshot
        .blocks
        .iter()
        .find(|b| b.kind == BlockKind::Heading1 && !b.content.trim().is_empty())
        .or_else(|| snapshot.blocks.iter().find(|b| !b.content.trim().is_empty()));

    match source {
        Some(block) => block.content.trim().chars().take(TITLE_CHARS).collect(),
        None => "Untitled".to_string(),
    }
}

fn doc_key(id: DocumentId) -> String {
    format!("{DOC_PREFIX}{id}")
}

/// Documents stored as JSON under `doc:<document_id>`.
#[derive(Debug)]
pub struct DocumentRepository<S> {
    kv: S,
}

impl<S: KvStore> DocumentRepository<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Save a snapshot, replacing any previous version.
    pub fn save(&self, snapshot: &StoreSnapshot) -> StoreResult<StoredDocument> {
        let stored = StoredDocument::new(snapshot.clone());
        let json = serde_json::to_string(&stored)?;
        self.kv.put(&doc_key(snapshot.document_id), &json)?;
        tracing::debug!(document = %snapshot.document_id.short(), blocks = snapshot.blocks.len(), "saved document");
        Ok(stored)
    }

    pub fn load(&self, id: DocumentId) -> StoreResult<Option<StoredDocument>> {
        match self.kv.get(&doc_key(id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        self.kv.delete(&doc_key(id))
    }

    /// Ids of all saved documents. Keys that do not parse are skipped.
    pub fn list(&self) -> StoreResult<Vec<DocumentId>> {
        let ids = self
            .kv
            .keys(DOC_PREFIX)?
            .into_iter()
            .filter_map(|key| {
                let id = key.strip_prefix(DOC_PREFIX)?;
                DocumentId::parse(id).ok()
            })
            .collect();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKv;
    use crate::sqlite::SqliteKv;
    use folio_doc::{BlockStore, DraftBlock};

    fn snapshot() -> StoreSnapshot {
        BlockStore::from_drafts(
            DocumentId::new(),
            vec![
                DraftBlock::new(BlockKind::Heading1, "LEASE AGREEMENT"),
                DraftBlock::paragraph("Rent is due monthly."),
            ],
        )
        .snapshot()
    }

    fn roundtrip<S: KvStore>(repo: DocumentRepository<S>) {
        let snap = snapshot();
        let saved = repo.save(&snap).unwrap();
        assert_eq!(saved.title, "LEASE AGREEMENT");

        let loaded = repo.load(snap.document_id).unwrap().unwrap();
        assert_eq!(loaded.snapshot, snap);
        assert_eq!(repo.list().unwrap(), vec![snap.document_id]);

        let restored = BlockStore::from_snapshot(loaded.snapshot).unwrap();
        assert_eq!(restored.block_ids(), BlockStore::from_snapshot(snap.clone()).unwrap().block_ids());

        assert!(repo.delete(snap.document_id).unwrap());
        assert!(repo.load(snap.document_id).unwrap().is_none());
    }

    #[test]
    fn test_memory_roundtrip() {
        roundtrip(DocumentRepository::new(MemoryKv::new()));
    }

    #[test]
    fn test_sqlite_roundtrip() {
        roundtrip(DocumentRepository::new(SqliteKv::in_memory().unwrap()));
    }

    #[test]
    fn test_title_falls_back() {
        let empty = BlockStore::new(DocumentId::new()).snapshot();
        assert_eq!(StoredDocument::new(empty).title, "Untitled");

        let body = BlockStore::from_drafts(DocumentId::new(), vec![DraftBlock::paragraph("  Notes  ")]).snapshot();
        assert_eq!(StoredDocument::new(body).title, "Notes");
    }

    #[test]
    fn test_corrupt_entry_is_an_error() {
        let kv = MemoryKv::new();
        let id = DocumentId::new();
        kv.put(&doc_key(id), "{not json").unwrap();

        let repo = DocumentRepository::new(&kv);
        assert!(matches!(
            repo.load(id),
            Err(crate::StoreError::Serialization(_))
        ));
    }
}
