//! Block-based document model for Folio.
//!
//! A document is a flat, ordered sequence of blocks held by a
//! [`BlockStore`]. Everything else is derived from it or kept beside it:
//!
//! - **Pages** are recomputed from scratch with a character-budget heuristic
//!   ([`paginate`]); blocks are never split across pages.
//! - **Suggestions** are pending AI edits in a [`SuggestionOverlay`]. They
//!   touch the store only when accepted.
//! - **Risk annotations** map block ids to severities from the last analysis
//!   ([`RiskAnnotations`]).
//!
//! [`DocumentSession`] owns all of the above for one editing session.
//!
//! # Cross-references
//!
//! Suggestions and annotations point at blocks by [`BlockId`], never by
//! position. A reference whose block has gone away resolves to nothing and
//! the operation is discarded with a named error; nothing here panics on
//! stale input.

mod block_store;
mod error;
pub mod export;
mod paginate;
mod risk;
mod session;
mod suggestion;

pub use block_store::{BlockStore, Merge, Removal, StoreSnapshot};
pub use error::DocError;
pub use paginate::{Page, PageConfig, page_of_index, paginate};
pub use risk::{AnnotatedFinding, RiskAnnotations};
pub use session::DocumentSession;
pub use suggestion::{
    Applied, Suggestion, SuggestionOverlay, SuggestionStatus, SuggestionTarget, fallback_paragraphs,
    parse_draft, preview, strip_code_fences,
};

pub use folio_types::{
    BlockId, BlockKind, BlockSnapshot, DocumentId, DraftBlock, PrefixError, RiskFinding, RiskLevel,
    SuggestionId, TypedId, resolve_prefix,
};

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocError>;
