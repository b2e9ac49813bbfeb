//! AI assistance for Folio documents.
//!
//! Wraps an injected [`Collaborator`] with the editor's conventions:
//! keyword intent classification, prompt templates, and parsing of drafting
//! and risk-audit replies. Nothing here mutates a document. Outcomes are
//! returned as suggestions or findings for the session to apply.

pub mod assistant;
pub mod clauses;
pub mod config;
mod error;
pub mod intent;
pub mod prompt;
pub mod provider;

pub use assistant::{AssistOutcome, Assistant, Plan, parse_findings};
pub use clauses::StandardClause;
pub use config::AssistConfig;
pub use error::{AssistError, AssistResult};
pub use intent::{Intent, IntentClassifier};
pub use provider::{Collaborator, GenerateRequest, ResponseFormat, ScriptedCollaborator};
