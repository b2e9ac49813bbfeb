//! Block store: the canonical ordered sequence of blocks.
//!
//! The store is the single source of truth for document content. Views
//! render from it and feed input events back into it; nothing else co-owns
//! block state. Ordering is positional (a `Vec`), which keeps every
//! structural operation a plain splice. Lookups by id are linear, fine for
//! documents of tens to low hundreds of blocks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{BlockId, BlockKind, BlockSnapshot, DocError, DocumentId, DraftBlock, Result};

/// Ordered collection of blocks belonging to one document.
///
/// Invariants:
/// - never empty (a document always has at least one block)
/// - block ids are unique and never reused: `next_seq` only moves forward
#[derive(Clone, Debug)]
pub struct BlockStore {
    /// Document this store belongs to.
    document_id: DocumentId,

    /// Blocks in document order.
    blocks: Vec<BlockSnapshot>,

    /// Next sequence number for block IDs.
    next_seq: u64,

    /// Store version (bumped on any mutation).
    version: u64,
}

/// Outcome of [`BlockStore::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The block was removed; `focus` is the block that should take focus.
    Removed { focus: BlockId },
    /// The block was the only one left and was kept.
    LastBlockKept,
}

/// Outcome of [`BlockStore::merge_with_previous`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Merge {
    /// Block that absorbed the content.
    pub into: BlockId,
    /// Caret position (chars) at the join point.
    pub caret: usize,
}

impl BlockStore {
    /// Create a store holding a single empty paragraph.
    pub fn new(document_id: DocumentId) -> Self {
        let mut store = Self {
            document_id,
            blocks: Vec::new(),
            next_seq: 0,
            version: 0,
        };
        store.ensure_not_empty();
        store
    }

    /// Create a store from draft blocks, in order.
    pub fn from_drafts(document_id: DocumentId, drafts: impl IntoIterator<Item = DraftBlock>) -> Self {
        let mut store = Self {
            document_id,
            blocks: Vec::new(),
            next_seq: 0,
            version: 0,
        };
        for draft in drafts {
            let id = store.new_block_id();
            store.blocks.push(BlockSnapshot::new(id, draft.kind, draft.content));
        }
        store.ensure_not_empty();
        store
    }

    fn ensure_not_empty(&mut self) {
        if self.blocks.is_empty() {
            let id = self.new_block_id();
            self.blocks.push(BlockSnapshot::new(id, BlockKind::Paragraph, ""));
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the document ID.
    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Get the current version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of blocks (always at least one).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a live store; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in document order.
    pub fn blocks(&self) -> &[BlockSnapshot] {
        &self.blocks
    }

    /// Block IDs in document order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    /// Get a block by ID.
    pub fn get(&self, id: &BlockId) -> Option<&BlockSnapshot> {
        self.blocks.iter().find(|b| b.id == *id)
    }

    /// Check whether a block is present.
    pub fn contains(&self, id: &BlockId) -> bool {
        self.position(id).is_some()
    }

    /// Current index of a block.
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == *id)
    }

    /// First block in document order.
    pub fn first(&self) -> Option<&BlockSnapshot> {
        self.blocks.first()
    }

    /// Last block in document order.
    pub fn last(&self) -> Option<&BlockSnapshot> {
        self.blocks.last()
    }

    /// ID of the last block. The store is never empty.
    pub fn last_id(&self) -> BlockId {
        self.blocks[self.blocks.len() - 1].id
    }

    /// Get full text content (blocks joined by newlines).
    pub fn full_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // =========================================================================
    // Block ID generation
    // =========================================================================

    fn new_block_id(&mut self) -> BlockId {
        let id = BlockId::new(self.document_id, self.next_seq);
        self.next_seq += 1;
        id
    }

    fn require(&self, id: &BlockId) -> Result<usize> {
        self.position(id).ok_or(DocError::BlockNotFound(*id))
    }

    // =========================================================================
    // Structural operations
    // =========================================================================

    /// Insert one or more blocks immediately after `anchor`, in order.
    ///
    /// Each block gets a fresh id. Returns the new ids; the first one is the
    /// focus target. An empty batch is a successful no-op.
    pub fn insert_after(
        &mut self,
        anchor: &BlockId,
        drafts: impl IntoIterator<Item = DraftBlock>,
    ) -> Result<Vec<BlockId>> {
        let idx = self
            .position(anchor)
            .ok_or(DocError::AnchorNotFound(*anchor))?;

        let mut ids = Vec::new();
        let new_blocks: Vec<BlockSnapshot> = drafts
            .into_iter()
            .map(|draft| {
                let id = self.new_block_id();
                ids.push(id);
                BlockSnapshot::new(id, draft.kind, draft.content)
            })
            .collect();

        if new_blocks.is_empty() {
            return Ok(ids);
        }

        self.blocks.splice(idx + 1..idx + 1, new_blocks);
        self.version += 1;
        tracing::debug!(anchor = %anchor, count = ids.len(), "inserted blocks");
        Ok(ids)
    }

    /// Insert a single block after `after`, or at the start when `None`.
    pub fn insert_block(
        &mut self,
        after: Option<&BlockId>,
        kind: BlockKind,
        content: impl Into<String>,
    ) -> Result<BlockId> {
        let idx = match after {
            Some(anchor) => self
                .position(anchor)
                .ok_or(DocError::AnchorNotFound(*anchor))?
                + 1,
            None => 0,
        };

        let id = self.new_block_id();
        self.blocks.insert(idx, BlockSnapshot::new(id, kind, content));
        self.version += 1;
        Ok(id)
    }

    /// Remove a block.
    ///
    /// Removing the only block is a no-op. Otherwise focus moves to the
    /// preceding block, or to the following one when the first is removed.
    pub fn remove(&mut self, id: &BlockId) -> Result<Removal> {
        let idx = self.require(id)?;
        if self.blocks.len() <= 1 {
            return Ok(Removal::LastBlockKept);
        }

        self.blocks.remove(idx);
        self.version += 1;

        let focus = if idx > 0 {
            self.blocks[idx - 1].id
        } else {
            self.blocks[0].id
        };
        Ok(Removal::Removed { focus })
    }

    /// Split a block at a caret position (chars, clamped to `[0, len]`).
    ///
    /// The original keeps the text before the caret; a new block of the same
    /// kind holding the remainder is inserted right after it.
    pub fn split(&mut self, id: &BlockId, caret: usize) -> Result<BlockId> {
        let idx = self.require(id)?;
        let new_id = self.new_block_id();

        let block = &mut self.blocks[idx];
        let at = byte_index(&block.content, caret);
        let tail = block.content.split_off(at);
        let kind = block.kind;

        self.blocks
            .insert(idx + 1, BlockSnapshot::new(new_id, kind, tail));
        self.version += 1;
        Ok(new_id)
    }

    /// Append a block's content to the previous block and remove it.
    pub fn merge_with_previous(&mut self, id: &BlockId) -> Result<Merge> {
        let idx = self.require(id)?;
        if idx == 0 {
            return Err(DocError::NothingToMerge(*id));
        }

        let removed = self.blocks.remove(idx);
        let prev = &mut self.blocks[idx - 1];
        let caret = prev.char_len();
        prev.content.push_str(&removed.content);
        let into = prev.id;

        self.version += 1;
        Ok(Merge { into, caret })
    }

    /// Move a block to just after `after`, or to the start when `None`.
    pub fn move_block(&mut self, id: &BlockId, after: Option<&BlockId>) -> Result<()> {
        let idx = self.require(id)?;
        if let Some(anchor) = after {
            if anchor == id {
                return Ok(());
            }
            if !self.contains(anchor) {
                return Err(DocError::AnchorNotFound(*anchor));
            }
        }

        let block = self.blocks.remove(idx);
        let target = match after {
            Some(anchor) => match self.position(anchor) {
                Some(pos) => pos + 1,
                None => {
                    // Validated above; restore and bail out.
                    self.blocks.insert(idx, block);
                    return Err(DocError::AnchorNotFound(*anchor));
                }
            },
            None => 0,
        };
        self.blocks.insert(target, block);
        self.version += 1;
        Ok(())
    }

    // =========================================================================
    // Content mutation
    // =========================================================================

    /// Replace a block's content; kind and id are unchanged.
    pub fn replace_content(&mut self, id: &BlockId, content: impl Into<String>) -> Result<()> {
        let idx = self.require(id)?;
        self.blocks[idx].content = content.into();
        self.version += 1;
        Ok(())
    }

    /// Change a block's kind without touching its content.
    pub fn set_kind(&mut self, id: &BlockId, kind: BlockKind) -> Result<()> {
        let idx = self.require(id)?;
        if self.blocks[idx].kind != kind {
            self.blocks[idx].kind = kind;
            self.version += 1;
        }
        Ok(())
    }

    /// Edit text within a block (character offsets).
    pub fn edit_text(&mut self, id: &BlockId, pos: usize, insert: &str, delete: usize) -> Result<()> {
        let idx = self.require(id)?;
        let block = &mut self.blocks[idx];

        let len = block.char_len();
        if pos > len {
            return Err(DocError::PositionOutOfBounds { pos, len });
        }
        let end = pos
            .checked_add(delete)
            .filter(|end| *end <= len)
            .ok_or(DocError::PositionOutOfBounds {
                pos: pos.saturating_add(delete),
                len,
            })?;

        let start = byte_index(&block.content, pos);
        let end = byte_index(&block.content, end);
        block.content.replace_range(start..end, insert);
        self.version += 1;
        Ok(())
    }

    // =========================================================================
    // Snapshot / Restore
    // =========================================================================

    /// Create a snapshot of the entire store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            document_id: self.document_id,
            next_seq: self.next_seq,
            blocks: self.blocks.clone(),
        }
    }

    /// Restore from a snapshot.
    ///
    /// The sequence counter resumes past every restored id. Blocks carrying
    /// another document's id are re-keyed into this document. Risk levels in
    /// the snapshot are dropped; annotations live in their own side-table.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let mut store = Self {
            document_id: snapshot.document_id,
            blocks: Vec::with_capacity(snapshot.blocks.len()),
            next_seq: snapshot.next_seq,
            version: 0,
        };

        let mut seen = HashSet::new();
        for block in &snapshot.blocks {
            if block.id.document_id == store.document_id {
                if !seen.insert(block.id) {
                    return Err(DocError::DuplicateBlock(block.id));
                }
                store.next_seq = store.next_seq.max(block.id.seq + 1);
            }
        }

        for block in snapshot.blocks {
            let id = if block.id.document_id == store.document_id {
                block.id
            } else {
                let fresh = store.new_block_id();
                tracing::debug!(from = %block.id, to = %fresh, "re-keyed foreign block");
                fresh
            };
            store
                .blocks
                .push(BlockSnapshot::new(id, block.kind, block.content));
        }

        store.ensure_not_empty();
        Ok(store)
    }
}

/// Byte index of the `char_pos`-th character, clamped to the end.
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Snapshot of a block store (serializable).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Document ID.
    pub document_id: DocumentId,
    /// Sequence counter at snapshot time.
    #[serde(default)]
    pub next_seq: u64,
    /// Blocks in order.
    pub blocks: Vec<BlockSnapshot>,
}

// =========================================================================
// Tests
// =========================================================================
