//! Keyword-based intent classification.
//!
//! Decides whether an instruction asks for new content (drafting), for a
//! rewrite of the block in focus (editing), or for an answer (chat). The
//! heuristic is a plain keyword match with no confirmation step, so a
//! question that merely mentions "draft" is treated as a drafting request.
//! English verbs match whole words only; "rewrite" is an edit.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::AssistResult;

/// Built-in drafting keywords (Russian and English).
pub const DRAFTING_KEYWORDS: &str =
    r"напиши|составь|подготовь|сделай|пример|иск|договор|пункт|раздел|\b(?:draft|write|compose|prepare)\b";

/// What an instruction asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// New structured content inserted after an anchor.
    Drafting,
    /// A rewrite of one block.
    Editing,
    /// A free-text answer about the document.
    Chat,
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    drafting: Regex,
}

impl IntentClassifier {
    /// Classifier with the built-in keyword set.
    pub fn new() -> AssistResult<Self> {
        Self::with_extra_keywords(None)
    }

    /// Classifier with additional keywords (a regex alternation).
    pub fn with_extra_keywords(extra: Option<&str>) -> AssistResult<Self> {
        let pattern = match extra.map(str::trim).filter(|e| !e.is_empty()) {
            Some(extra) => format!("{DRAFTING_KEYWORDS}|{extra}"),
            None => DRAFTING_KEYWORDS.to_string(),
        };
        let drafting = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self { drafting })
    }

    /// Drafting wins over everything; otherwise a target block means editing.
    pub fn classify(&self, instruction: &str, has_target: bool) -> Intent {
        if self.drafting.is_match(instruction) {
            Intent::Drafting
        } else if has_target {
            Intent::Editing
        } else {
            Intent::Chat
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drafting_keywords() {
        let classifier = IntentClassifier::new().unwrap();
        assert_eq!(classifier.classify("Напиши пункт о конфиденциальности", false), Intent::Drafting);
        assert_eq!(classifier.classify("СОСТАВЬ договор аренды", true), Intent::Drafting);
        assert_eq!(classifier.classify("Draft a termination clause", false), Intent::Drafting);
    }

    #[test]
    fn test_editing_needs_target() {
        let classifier = IntentClassifier::new().unwrap();
        assert_eq!(classifier.classify("make this more formal", true), Intent::Editing);
        assert_eq!(classifier.classify("make this more formal", false), Intent::Chat);
    }

    #[test]
    fn test_keyword_inside_question_still_drafts() {
        // Known limitation of the keyword heuristic.
        let classifier = IntentClassifier::new().unwrap();
        assert_eq!(
            classifier.classify("Should we draft an NDA first?", false),
            Intent::Drafting
        );
    }

    #[test]
    fn test_rewrite_with_target_is_editing() {
        let classifier = IntentClassifier::new().unwrap();
        assert_eq!(classifier.classify("Rewrite this clause", true), Intent::Editing);
        assert_eq!(classifier.classify("Rewrite this more formally", true), Intent::Editing);
        assert_eq!(classifier.classify("Tighten this section", true), Intent::Editing);
        assert_eq!(classifier.classify("Write a preamble", true), Intent::Drafting);
    }

    #[test]
    fn test_extra_keywords() {
        let classifier = IntentClassifier::with_extra_keywords(Some("annex")).unwrap();
        assert_eq!(classifier.classify("Add an ANNEX", false), Intent::Drafting);
        assert!(IntentClassifier::with_extra_keywords(Some("(")).is_err());
    }
}
