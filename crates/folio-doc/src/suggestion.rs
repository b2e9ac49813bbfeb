//! Suggestion overlay: pending AI edits kept beside the document.
//!
//! A suggestion never touches the block store until it is accepted. It
//! targets a block by id: either replacing that block's content, or
//! inserting a batch of new blocks right after it (the anchor).

use serde::{Deserialize, Serialize};

use crate::block_store::BlockStore;
use crate::{BlockId, DocError, DraftBlock, Result, SuggestionId};

/// What an accepted suggestion does to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "block", rename_all = "snake_case")]
pub enum SuggestionTarget {
    /// Replace the content of this block.
    Replace(BlockId),
    /// Insert new blocks immediately after this anchor.
    InsertAfter(BlockId),
}

impl SuggestionTarget {
    /// The block this target points at.
    pub fn block(&self) -> BlockId {
        match self {
            SuggestionTarget::Replace(id) | SuggestionTarget::InsertAfter(id) => *id,
        }
    }

    pub fn is_insertion(&self) -> bool {
        matches!(self, SuggestionTarget::InsertAfter(_))
    }
}

/// Suggestion lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// A proposed edit awaiting a decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub target: SuggestionTarget,
    /// Replacement text, or raw draft text for insertions.
    pub payload: String,
    /// Block content when the suggestion was made, for diff rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    pub reason: String,
    #[serde(default)]
    pub status: SuggestionStatus,
    pub created_at: u64,
}

impl Suggestion {
    /// A replacement of `block`'s content.
    pub fn replace(block: BlockId, payload: impl Into<String>, original: Option<String>) -> Self {
        Self {
            id: SuggestionId::new(),
            target: SuggestionTarget::Replace(block),
            payload: payload.into(),
            original,
            reason: "AI Edit".to_string(),
            status: SuggestionStatus::Pending,
            created_at: folio_types::now_millis(),
        }
    }

    /// An insertion of drafted blocks after `anchor`.
    pub fn insertion(anchor: BlockId, payload: impl Into<String>) -> Self {
        Self {
            id: SuggestionId::new(),
            target: SuggestionTarget::InsertAfter(anchor),
            payload: payload.into(),
            original: None,
            reason: "AI Draft".to_string(),
            status: SuggestionStatus::Pending,
            created_at: folio_types::now_millis(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// Result of accepting a suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    /// The accepted suggestion (status `Accepted`).
    pub suggestion: Suggestion,
    /// Ids of blocks created by an insertion, in order.
    pub inserted: Vec<BlockId>,
    /// First affected block; takes focus.
    pub focus: BlockId,
    /// Set for insertions so the view can bring new content into sight.
    pub scroll_to: Option<BlockId>,
}

/// Pending suggestions, in proposal order.
///
/// At most one pending suggestion exists per target: proposing another one
/// for the same target supersedes the older.
#[derive(Clone, Debug, Default)]
pub struct SuggestionOverlay {
    pending: Vec<Suggestion>,
}

impl SuggestionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a suggestion to the pending set.
    ///
    /// Returns the suggestion it superseded, if any.
    pub fn propose(&mut self, mut suggestion: Suggestion) -> Option<Suggestion> {
        suggestion.status = SuggestionStatus::Pending;

        let superseded = self
            .pending
            .iter()
            .position(|s| s.target == suggestion.target)
            .map(|idx| self.pending.remove(idx));

        if let Some(old) = &superseded {
            tracing::info!(
                old = %old.id,
                new = %suggestion.id,
                block = %suggestion.target.block(),
                "suggestion superseded"
            );
        }

        self.pending.push(suggestion);
        superseded
    }

    /// Apply a pending suggestion to `store`.
    ///
    /// The suggestion leaves the pending set whether or not the mutation
    /// succeeds, so a stale suggestion is discarded rather than retried.
    /// Unknown ids are a no-op.
    pub fn accept(&mut self, id: &SuggestionId, store: &mut BlockStore) -> Result<Option<Applied>> {
        let Some(idx) = self.pending.iter().position(|s| s.id == *id) else {
            return Ok(None);
        };
        let mut suggestion = self.pending.remove(idx);

        let applied = match suggestion.target {
            SuggestionTarget::Replace(block) => store
                .replace_content(&block, suggestion.payload.as_str())
                .map(|()| (Vec::new(), block, None)),
            SuggestionTarget::InsertAfter(anchor) => {
                let drafts = preview(&suggestion.payload);
                store.insert_after(&anchor, drafts).map(|ids| {
                    let focus = ids.first().copied().unwrap_or(anchor);
                    (ids, focus, Some(focus))
                })
            }
        };

        match applied {
            Ok((inserted, focus, scroll_to)) => {
                suggestion.status = SuggestionStatus::Accepted;
                tracing::debug!(suggestion = %suggestion.id, inserted = inserted.len(), "suggestion accepted");
                Ok(Some(Applied {
                    suggestion,
                    inserted,
                    focus,
                    scroll_to,
                }))
            }
            Err(e) => {
                tracing::warn!(suggestion = %suggestion.id, error = %e, "discarding stale suggestion");
                Err(e)
            }
        }
    }

    /// Drop a pending suggestion without touching the store.
    pub fn reject(&mut self, id: &SuggestionId) -> Option<Suggestion> {
        let idx = self.pending.iter().position(|s| s.id == *id)?;
        let mut suggestion = self.pending.remove(idx);
        suggestion.status = SuggestionStatus::Rejected;
        Some(suggestion)
    }

    pub fn get(&self, id: &SuggestionId) -> Option<&Suggestion> {
        self.pending.iter().find(|s| s.id == *id)
    }

    /// Pending suggestions in proposal order.
    pub fn pending(&self) -> &[Suggestion] {
        &self.pending
    }

    /// The pending replacement for `block`, if any.
    pub fn for_block(&self, block: &BlockId) -> Option<&Suggestion> {
        self.pending
            .iter()
            .find(|s| s.target == SuggestionTarget::Replace(*block))
    }

    /// Pending insertions anchored at `block`.
    pub fn insertions_after(&self, block: &BlockId) -> impl Iterator<Item = &Suggestion> + '_ {
        let target = SuggestionTarget::InsertAfter(*block);
        self.pending.iter().filter(move |s| s.target == target)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

// ============================================================================
// Draft payload parsing
// ============================================================================

/// Strip a surrounding markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a structured draft: a JSON array of `{type, content}`.
pub fn parse_draft(payload: &str) -> Result<Vec<DraftBlock>> {
    serde_json::from_str(strip_code_fences(payload))
        .map_err(|e| DocError::MalformedSuggestionPayload(e.to_string()))
}

/// One paragraph per non-blank line, text kept as written.
pub fn fallback_paragraphs(payload: &str) -> Vec<DraftBlock> {
    strip_code_fences(payload)
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(DraftBlock::paragraph)
        .collect()
}

/// Blocks an insertion payload would produce, without mutating anything.
///
/// Structured drafts are used as-is; anything else falls back to one
/// paragraph per non-empty line.
pub fn preview(payload: &str) -> Vec<DraftBlock> {
    match parse_draft(payload) {
        Ok(drafts) => drafts,
        Err(e) => {
            tracing::warn!(error = %e, "draft is not structured, splitting into paragraphs");
            fallback_paragraphs(payload)
        }
    }
}
