//! Prompt templates.

use folio_doc::BlockSnapshot;

/// Structured drafting: the reply must be a JSON array of `{type, content}`.
pub fn drafting(instruction: &str) -> String {
    format!(
        r#"ROLE: Expert Legal Drafter.
TASK: Draft legal content based on the request.
USER REQUEST: "{instruction}"
CONTEXT: The document is a contract or other legal document.

OUTPUT FORMAT: JSON array of objects.
Example: [{{"type": "h2", "content": "Title"}}, {{"type": "p", "content": "Text..."}}, {{"type": "li", "content": "Item 1"}}]
Supported types: 'h1', 'h2', 'p', 'li'.

CRITICAL: Return ONLY raw JSON. No markdown fencing. No preamble."#
    )
}

/// Rewrite of a single clause: the reply is the new clause text.
pub fn editing(instruction: &str, clause: &str) -> String {
    format!(
        r#"ROLE: Senior Legal Editor.
TASK: Edit a specific clause.
TARGET CLAUSE: "{clause}"
USER INSTRUCTION: {instruction}
OUTPUT: Return ONLY the new text for the clause. No quotes."#
    )
}

/// Free-text consultation over the first `context_chars` of the document.
pub fn consulting(instruction: &str, document_text: &str, context_chars: usize) -> String {
    let context = truncate_chars(document_text, context_chars);
    format!(
        r#"ROLE: Legal Consultant.
DOCUMENT CONTEXT: "{context}..."
USER QUERY: {instruction}
Answer professionally, in the language of the query."#
    )
}

/// Risk audit: every block is listed with its short reference.
pub fn risk_audit(blocks: &[BlockSnapshot]) -> String {
    let document = blocks
        .iter()
        .map(|b| format!("[ID: {}] {}", b.id.to_ref(), b.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"ROLE: Legal Risk Auditor.
TASK: Analyze for risks (ambiguity, unfavorable terms).
DOCUMENT: """{document}"""
OUTPUT FORMAT (JSON ARRAY ONLY):
[{{"id": "1", "severity": "high", "title": "Risk Title", "description": "Short explanation", "blockIdRef": "ID"}}]"#
    )
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_doc::{BlockId, BlockKind, DocumentId};

    #[test]
    fn test_drafting_prompt_asks_for_json() {
        let prompt = drafting("Draft a lease");
        assert!(prompt.contains(r#"USER REQUEST: "Draft a lease""#));
        assert!(prompt.contains(r#"{"type": "h2", "content": "Title"}"#));
    }

    #[test]
    fn test_consulting_truncates_context() {
        let text = "я".repeat(5000);
        let prompt = consulting("What is this?", &text, 3000);
        assert_eq!(prompt.matches('я').count(), 3000);
    }

    #[test]
    fn test_risk_audit_lists_refs() {
        let doc = DocumentId::new();
        let blocks = vec![
            BlockSnapshot::new(BlockId::new(doc, 0), BlockKind::Heading1, "Lease"),
            BlockSnapshot::new(BlockId::new(doc, 4), BlockKind::Paragraph, "Rent is due."),
        ];
        let prompt = risk_audit(&blocks);
        assert!(prompt.contains("[ID: 0] Lease\n[ID: 4] Rent is due."));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 3), "hi");
        assert_eq!(truncate_chars("Договор", 3), "Дог");
    }
}
