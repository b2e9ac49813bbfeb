//! Collaborator configuration.

use serde::{Deserialize, Serialize};

/// Default model for hosted drafting.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// How much of the document a consulting prompt carries, in characters.
pub const DEFAULT_CONTEXT_CHARS: usize = 3000;

/// Assistant settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Model requested for every call.
    pub model: String,
    /// Characters of document text sent with consulting questions.
    pub context_chars: usize,
    /// Extra drafting keywords (regex alternation), added to the built-in set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drafting_keywords: Option<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            context_chars: DEFAULT_CONTEXT_CHARS,
            drafting_keywords: None,
        }
    }
}
