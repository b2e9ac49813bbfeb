//! Reading and writing document files.
//!
//! Accepted inputs, tried in order: a store snapshot (`{document_id, blocks}`),
//! a draft array (`[{type, content}]`), or plain text (one paragraph per
//! non-empty line).

use std::path::Path;

use anyhow::{Context, Result};
use folio_doc::{BlockId, BlockStore, DocumentId, StoreSnapshot, fallback_paragraphs, parse_draft};

/// Load a document file into a store.
pub fn load(path: &Path) -> Result<BlockStore> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text)
}

/// Parse document text in any accepted format.
pub fn parse(text: &str) -> Result<BlockStore> {
    if let Ok(snapshot) = serde_json::from_str::<StoreSnapshot>(text) {
        return BlockStore::from_snapshot(snapshot).context("invalid document snapshot");
    }
    let drafts = match parse_draft(text) {
        Ok(drafts) => drafts,
        Err(_) => fallback_paragraphs(text),
    };
    Ok(BlockStore::from_drafts(DocumentId::new(), drafts))
}

/// Write a store snapshot as pretty JSON, to `out` or stdout.
pub fn write(snapshot: &StoreSnapshot, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    emit(&json, out)
}

/// Write text to `out`, or print it.
pub fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Resolve a block reference (the `seq` shown by `folio paginate`).
pub fn resolve_ref(store: &BlockStore, reference: &str) -> Result<BlockId> {
    BlockId::from_ref(store.document_id(), reference)
        .filter(|id| store.contains(id))
        .with_context(|| format!("no block with reference {reference:?}"))
}
