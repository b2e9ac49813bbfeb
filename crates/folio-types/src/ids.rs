//! Typed identifiers for documents and suggestions.
//!
//! Both wrap UUIDv7 (time-ordered, globally unique) and display as standard
//! UUID text for logging. The `short()` form (first 8 hex chars) is for
//! human-facing output; lookups from short input go through
//! [`resolve_prefix`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(uuid::Uuid);

/// A suggestion identifier (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuggestionId(uuid::Uuid);

/// Common surface of the UUID-backed id types.
pub trait TypedId: Copy {
    /// First 8 hex characters.
    fn short(&self) -> String;

    /// Full 32-character hex string (no hyphens).
    fn to_hex(&self) -> String;

    /// Check if a query string matches this ID by hex prefix.
    fn matches_hex_prefix(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.replace('-', "").to_ascii_lowercase())
    }
}

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// The raw 16 bytes.
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// Reconstruct from 16 bytes.
            pub fn from_bytes(b: [u8; 16]) -> Self {
                Self(uuid::Uuid::from_bytes(b))
            }

            /// Parse from a hex string (32 chars, no hyphens) or standard UUID format.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                uuid::Uuid::parse_str(s).map(Self)
            }

            /// A nil / zero ID, for sentinel values only.
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Check if this is the nil ID.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl TypedId for $T {
            fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<uuid::Uuid> for $T {
            fn from(u: uuid::Uuid) -> Self {
                Self(u)
            }
        }

        impl From<$T> for uuid::Uuid {
            fn from(id: $T) -> uuid::Uuid {
                id.0
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, TypedId::short(self))
            }
        }
    };
}

impl_typed_id!(DocumentId, "DocumentId");
impl_typed_id!(SuggestionId, "SuggestionId");

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no match for prefix '{0}'")]
    NoMatch(String),
    #[error("ambiguous prefix '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a hex prefix (with or without hyphens) against a set of ids.
///
/// An empty query never matches, even when there is a single candidate.
pub fn resolve_prefix<T: TypedId>(
    candidates: impl Iterator<Item = T>,
    query: &str,
) -> Result<T, PrefixError> {
    if query.is_empty() {
        return Err(PrefixError::NoMatch(query.to_string()));
    }

    let matches: Vec<T> = candidates.filter(|id| id.matches_hex_prefix(query)).collect();

    match matches.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: matches.iter().map(|id| id.short()).collect(),
        }),
    }
}
