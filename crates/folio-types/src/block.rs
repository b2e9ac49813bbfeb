//! Block identity, kinds, and snapshots.
//!
//! A document is a flat, ordered sequence of blocks. Each block is one
//! heading, paragraph, or list item; its [`BlockId`] is the only valid
//! cross-reference key (suggestions and risk annotations point at ids, never
//! at positions, since positions shift on every edit).

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::EnumString;

use crate::ids::{DocumentId, TypedId};

/// Document-unique block identifier.
///
/// Composed of:
/// - `document_id`: The document this block belongs to
/// - `seq`: Store-local sequence number, handed out monotonically and never
///   rewound, so an id is never reused after its block is deleted.
#[derive(Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct BlockId {
    /// Document this block belongs to.
    pub document_id: DocumentId,
    /// Store-local sequence number.
    pub seq: u64,
}

impl BlockId {
    /// Create a block ID from its components.
    pub fn new(document_id: DocumentId, seq: u64) -> Self {
        Self { document_id, seq }
    }

    /// Convert to a compact string key: `"{document_hex}:{seq}"`.
    pub fn to_key(&self) -> String {
        format!("{}:{}", self.document_id.to_hex(), self.seq)
    }

    /// Parse from key string: `"{document_hex}:{seq}"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (doc, seq) = key.split_once(':')?;
        let document_id = DocumentId::parse(doc).ok()?;
        let seq: u64 = seq.parse().ok()?;
        Some(Self { document_id, seq })
    }

    /// Short reference used inside prompts (`[ID: 3]`).
    ///
    /// Only unique within one document; resolve with [`BlockId::from_ref`].
    pub fn to_ref(&self) -> String {
        self.seq.to_string()
    }

    /// Resolve a prompt reference back into an id of `document_id`.
    pub fn from_ref(document_id: DocumentId, reference: &str) -> Option<Self> {
        let seq: u64 = reference.trim().parse().ok()?;
        Some(Self { document_id, seq })
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.document_id.short(), self.seq)
    }
}

impl std::fmt::Debug for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BlockId({}#{})", self.document_id.short(), self.seq)
    }
}

/// What a block *is*.
///
/// Closed set. Wire names follow the editor markup (`h1`, `h2`, `p`, `li`);
/// parsing accepts a few aliases that drafting responses tend to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    /// Document title.
    #[serde(rename = "h1", alias = "heading1")]
    #[strum(serialize = "h1", serialize = "heading1", serialize = "title")]
    Heading1,
    /// Section heading.
    #[serde(rename = "h2", alias = "heading2")]
    #[strum(serialize = "h2", serialize = "heading2", serialize = "section")]
    Heading2,
    /// Body text.
    #[default]
    #[serde(rename = "p", alias = "paragraph")]
    #[strum(
        serialize = "p",
        serialize = "paragraph",
        serialize = "ul",
        serialize = "clause",
        serialize = "text"
    )]
    Paragraph,
    /// Bulleted list item.
    #[serde(rename = "li", alias = "list_item")]
    #[strum(serialize = "li", serialize = "list_item", serialize = "listitem")]
    ListItem,
}

impl BlockKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s.trim()).ok()
    }

    /// Parse, falling back to [`BlockKind::Paragraph`] for anything unknown.
    pub fn from_str_lenient(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading1 => "h1",
            BlockKind::Heading2 => "h2",
            BlockKind::Paragraph => "p",
            BlockKind::ListItem => "li",
        }
    }

    /// Check if this is a heading of any level.
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading1 | BlockKind::Heading2)
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity tag from a risk analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s.trim()).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serializable snapshot of a block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    /// Block ID.
    pub id: BlockId,
    /// Heading / paragraph / list item.
    pub kind: BlockKind,
    /// Plain text content.
    pub content: String,
    /// Severity from the last risk analysis, if this block was flagged.
    ///
    /// Not owned by the block: filled in from the annotation side-table when
    /// a view is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

impl BlockSnapshot {
    /// Create a new snapshot with no risk annotation.
    pub fn new(id: BlockId, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            risk_level: None,
        }
    }

    /// Content length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A block proposed for insertion, before it has an id.
///
/// This is the `{type, content}` shape drafting responses use. The `type`
/// field is parsed leniently: unknown kinds become paragraphs instead of
/// failing the whole draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftBlock {
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: BlockKind,
    pub content: String,
}

impl DraftBlock {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn paragraph(content: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, content)
    }
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<BlockKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(BlockKind::from_str_lenient(&raw))
}
