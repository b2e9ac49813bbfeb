//! The assistant: turns instructions into suggestions or replies.
//!
//! Work is split in two halves. [`Assistant::plan`] reads the session
//! synchronously and captures everything the call needs (prompt, anchor,
//! original text). [`Assistant::run`] awaits the collaborator and builds
//! the outcome without looking at the session again, so the document may
//! change while a reply is in flight. A reply whose anchor has vanished by
//! the time it is accepted is discarded by the overlay.

use std::sync::Arc;

use folio_doc::{BlockId, BlockSnapshot, DocumentSession, RiskFinding, Suggestion, strip_code_fences};

use crate::config::AssistConfig;
use crate::error::{AssistError, AssistResult};
use crate::intent::{Intent, IntentClassifier};
use crate::prompt;
use crate::provider::{Collaborator, GenerateRequest};

/// What a successful call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistOutcome {
    /// A pending edit to propose into the session.
    Suggestion(Suggestion),
    /// A free-text answer.
    Reply(String),
}

impl AssistOutcome {
    /// Short confirmation shown in the conversation.
    pub fn message(&self) -> &str {
        match self {
            AssistOutcome::Suggestion(s) if s.target.is_insertion() => {
                "Draft prepared. Review it in the document."
            }
            AssistOutcome::Suggestion(_) => "Proposed an edit for the selected clause.",
            AssistOutcome::Reply(text) => text,
        }
    }
}

/// A call captured from session state, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub intent: Intent,
    pub request: GenerateRequest,
    target: PlanTarget,
}

#[derive(Debug, Clone, PartialEq)]
enum PlanTarget {
    InsertAfter(BlockId),
    Replace { block: BlockId, original: String },
    None,
}

pub struct Assistant {
    collaborator: Arc<dyn Collaborator>,
    classifier: IntentClassifier,
    config: AssistConfig,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("collaborator", &self.collaborator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Assistant {
    pub fn new(collaborator: Arc<dyn Collaborator>, config: AssistConfig) -> AssistResult<Self> {
        let classifier = IntentClassifier::with_extra_keywords(config.drafting_keywords.as_deref())?;
        Ok(Self {
            collaborator,
            classifier,
            config,
        })
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Capture a call from the current session state.
    ///
    /// `target` overrides the session focus as the block to edit.
    pub fn plan(
        &self,
        session: &DocumentSession,
        instruction: &str,
        target: Option<BlockId>,
    ) -> AssistResult<Plan> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(AssistError::EmptyInstruction);
        }

        let active = session.active_block(target);
        let intent = self.classifier.classify(instruction, active.is_some());

        let (request, target) = match (intent, active) {
            (Intent::Drafting, _) => (
                GenerateRequest::new(prompt::drafting(instruction)).json(),
                PlanTarget::InsertAfter(session.insertion_anchor()),
            ),
            (Intent::Editing, Some(block)) => (
                GenerateRequest::new(prompt::editing(instruction, &block.content)),
                PlanTarget::Replace {
                    block: block.id,
                    original: block.content.clone(),
                },
            ),
            _ => (
                GenerateRequest::new(prompt::consulting(
                    instruction,
                    &session.store().full_text(),
                    self.config.context_chars,
                )),
                PlanTarget::None,
            ),
        };

        Ok(Plan {
            intent,
            request: request.with_model(self.config.model.as_str()),
            target,
        })
    }

    /// Send a planned call and shape the reply.
    pub async fn run(&self, plan: Plan) -> AssistResult<AssistOutcome> {
        let Plan {
            intent,
            request,
            target,
        } = plan;

        let reply = self.collaborator.generate(request).await.inspect_err(|e| {
            tracing::warn!(collaborator = self.collaborator.name(), error = %e, "collaborator call failed");
        })?;
        let reply = reply.trim().to_string();

        let outcome = match target {
            PlanTarget::InsertAfter(anchor) => AssistOutcome::Suggestion(
                Suggestion::insertion(anchor, reply).with_reason("AI Structure Draft"),
            ),
            PlanTarget::Replace { block, original } => {
                AssistOutcome::Suggestion(Suggestion::replace(block, reply, Some(original)))
            }
            PlanTarget::None => AssistOutcome::Reply(reply),
        };

        tracing::debug!(?intent, "assistant call complete");
        Ok(outcome)
    }

    /// Plan and run in one step.
    pub async fn ask(
        &self,
        session: &DocumentSession,
        instruction: &str,
        target: Option<BlockId>,
    ) -> AssistResult<AssistOutcome> {
        let plan = self.plan(session, instruction, target)?;
        self.run(plan).await
    }

    /// Run a risk audit over `blocks`.
    ///
    /// An empty reply means no findings; anything else must be a JSON array.
    pub async fn analyze_risks(&self, blocks: &[BlockSnapshot]) -> AssistResult<Vec<RiskFinding>> {
        let request = GenerateRequest::new(prompt::risk_audit(blocks))
            .json()
            .with_model(self.config.model.as_str());

        let reply = self.collaborator.generate(request).await?;
        let findings = parse_findings(&reply)?;
        tracing::info!(findings = findings.len(), "risk analysis complete");
        Ok(findings)
    }
}

/// Parse a risk-audit reply.
pub fn parse_findings(reply: &str) -> AssistResult<Vec<RiskFinding>> {
    let body = strip_code_fences(reply);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|e| AssistError::MalformedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ResponseFormat, ScriptedCollaborator};
    use folio_doc::{BlockKind, BlockStore, DocumentId, DraftBlock, RiskLevel, SuggestionTarget};

    fn test_session() -> DocumentSession {
        DocumentSession::with_store(BlockStore::from_drafts(
            DocumentId::new(),
            vec![
                DraftBlock::new(BlockKind::Heading1, "AGREEMENT"),
                DraftBlock::paragraph("The tenant pays rent."),
            ],
        ))
    }

    fn assistant(collaborator: &Arc<ScriptedCollaborator>) -> Assistant {
        Assistant::new(collaborator.clone(), AssistConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_drafting_becomes_insertion_at_last_block() {
        let collaborator = Arc::new(ScriptedCollaborator::with_replies([
            r#"[{"type":"h2","content":"Deposit"},{"type":"p","content":"Two months."}]"#,
        ]));
        let assistant = assistant(&collaborator);
        let mut session = test_session();
        let last = session.store().block_ids()[1];

        let outcome = assistant.ask(&session, "Draft a deposit section", None).await.unwrap();
        let AssistOutcome::Suggestion(suggestion) = outcome else {
            panic!("expected a suggestion");
        };
        assert_eq!(suggestion.target, SuggestionTarget::InsertAfter(last));

        let requests = collaborator.requests();
        assert_eq!(requests[0].format, ResponseFormat::Json);
        assert_eq!(requests[0].model.as_deref(), Some("gemini-2.5-flash"));

        let sid = suggestion.id;
        session.propose(suggestion);
        session.accept(&sid).unwrap();
        assert_eq!(session.store().len(), 4);
        assert_eq!(session.store().blocks()[2].kind, BlockKind::Heading2);
    }

    #[tokio::test]
    async fn test_editing_targets_focused_block() {
        let collaborator = Arc::new(ScriptedCollaborator::with_replies(["  The Tenant shall pay rent.  "]));
        let assistant = assistant(&collaborator);
        let mut session = test_session();
        let body = session.store().block_ids()[1];
        session.set_focus(body);

        let outcome = assistant.ask(&session, "make it formal", None).await.unwrap();
        let AssistOutcome::Suggestion(suggestion) = outcome else {
            panic!("expected a suggestion");
        };
        assert_eq!(suggestion.target, SuggestionTarget::Replace(body));
        assert_eq!(suggestion.payload, "The Tenant shall pay rent.");
        assert_eq!(suggestion.original.as_deref(), Some("The tenant pays rent."));
        assert!(collaborator.requests()[0].prompt.contains("The tenant pays rent."));
    }

    #[tokio::test]
    async fn test_chat_without_target() {
        let collaborator = Arc::new(ScriptedCollaborator::with_replies(["It is a lease."]));
        let assistant = assistant(&collaborator);
        let session = test_session();

        let outcome = assistant.ask(&session, "what is this?", None).await.unwrap();
        assert_eq!(outcome, AssistOutcome::Reply("It is a lease.".into()));
        assert_eq!(outcome.message(), "It is a lease.");
        assert!(collaborator.requests()[0].prompt.contains("AGREEMENT\nThe tenant pays rent."));
    }

    #[tokio::test]
    async fn test_collaborator_failure_leaves_session_unchanged() {
        let collaborator = Arc::new(ScriptedCollaborator::new());
        collaborator.push_failure(AssistError::Api("quota".into()));
        let assistant = assistant(&collaborator);
        let session = test_session();
        let before = session.snapshot();

        let err = assistant.ask(&session, "Draft a clause", None).await.unwrap_err();
        assert!(err.is_collaborator_failure());
        assert_eq!(session.snapshot(), before);
        assert!(session.overlay().is_empty());
    }

    #[tokio::test]
    async fn test_empty_instruction() {
        let collaborator = Arc::new(ScriptedCollaborator::new());
        let assistant = assistant(&collaborator);
        let err = assistant.ask(&test_session(), "   ", None).await.unwrap_err();
        assert!(matches!(err, AssistError::EmptyInstruction));
        assert!(!err.is_collaborator_failure());
        assert!(collaborator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_plan_survives_document_changes() {
        let collaborator = Arc::new(ScriptedCollaborator::with_replies(["New paragraph"]));
        let assistant = assistant(&collaborator);
        let mut session = test_session();
        let last = session.store().block_ids()[1];

        let plan = assistant.plan(&session, "write more", None).unwrap();
        assert_eq!(plan.intent, Intent::Drafting);
        session.remove(&last).unwrap();

        let AssistOutcome::Suggestion(suggestion) = assistant.run(plan).await.unwrap() else {
            panic!("expected a suggestion");
        };
        let sid = suggestion.id;
        session.propose(suggestion);
        assert!(session.accept(&sid).is_err());
        assert_eq!(session.store().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_risks() {
        let session = test_session();
        let body = session.store().block_ids()[1];
        let reply = format!(
            r#"```json
[{{"id":"1","severity":"high","title":"No due date","description":"Rent has no due date","blockIdRef":"{}"}}]
```"#,
            body.to_ref()
        );
        let collaborator = Arc::new(ScriptedCollaborator::with_replies([reply]));
        let assistant = assistant(&collaborator);

        let findings = assistant.analyze_risks(session.store().blocks()).await.unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, RiskLevel::High);
        assert!(collaborator.requests()[0].prompt.contains(&format!("[ID: {}]", body.to_ref())));
    }

    #[tokio::test]
    async fn test_analyze_risks_malformed() {
        let collaborator = Arc::new(ScriptedCollaborator::with_replies(["not json"]));
        let assistant = assistant(&collaborator);
        let err = assistant.analyze_risks(test_session().store().blocks()).await.unwrap_err();
        assert!(matches!(err, AssistError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_findings_empty_reply() {
        assert!(parse_findings("").unwrap().is_empty());
        assert!(parse_findings("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_findings_capitalized_severity() {
        let reply = r#"[
            {"id":"1","severity":"High","title":"Penalty","description":"Uncapped","blockIdRef":"1"},
            {"id":"2","severity":"Medium","title":"Notice","description":"Short","blockIdRef":"2"}
        ]"#;
        let findings = parse_findings(reply).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, RiskLevel::High);
        assert_eq!(findings[1].severity, RiskLevel::Medium);
    }
}
