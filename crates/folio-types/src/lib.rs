//! Shared identity and block types for Folio.
//!
//! A pure leaf crate: typed ids, block kinds, snapshots, drafts, and risk
//! findings. Every other folio crate builds on it.
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`DocumentId`]    | Which document                               |
//! | [`BlockId`]       | Unique block address (document + seq)        |
//! | [`SuggestionId`]  | Which pending AI suggestion                  |
//! | [`BlockKind`]     | h1 / h2 / p / li                             |
//! | [`BlockSnapshot`] | Serializable block state                     |
//! | [`DraftBlock`]    | `{type, content}` pair awaiting insertion    |
//! | [`RiskFinding`]   | One result of a risk analysis                |
//! |-------------------|----------------------------------------------|

pub mod block;
pub mod ids;
pub mod risk;

pub use block::{BlockId, BlockKind, BlockSnapshot, DraftBlock, RiskLevel};
pub use ids::{DocumentId, PrefixError, SuggestionId, TypedId, resolve_prefix};
pub use risk::RiskFinding;

/// Current time as Unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
