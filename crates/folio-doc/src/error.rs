//! Error types for document operations.
//!
//! Every variant is a benign, named no-op from the caller's point of view:
//! the document is left unchanged and nothing here is fatal.

use thiserror::Error;

use crate::BlockId;

/// Errors that can occur during document operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    /// A mutation referenced a block that is no longer present.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// An insertion's anchor block vanished between request and response.
    #[error("anchor block not found: {0:?}")]
    AnchorNotFound(BlockId),

    /// A structured draft could not be parsed.
    ///
    /// Callers recover through the line-split fallback; this is surfaced
    /// only by the strict parser.
    #[error("malformed suggestion payload: {0}")]
    MalformedSuggestionPayload(String),

    /// Edit position out of bounds (character offsets).
    #[error("edit position {pos} out of bounds for block with length {len}")]
    PositionOutOfBounds { pos: usize, len: usize },

    /// Merge-with-previous on the first block.
    #[error("block {0:?} has no previous block to merge into")]
    NothingToMerge(BlockId),

    /// Restoring a snapshot that repeats a block id.
    #[error("block already exists: {0:?}")]
    DuplicateBlock(BlockId),
}
