//! AI collaborator abstraction.
//!
//! The editor never talks to a model directly. It hands a
//! [`GenerateRequest`] to whatever [`Collaborator`] was injected and gets
//! text back. Hosted collaborators live outside this crate; the
//! [`ScriptedCollaborator`] here replays canned replies for tests and
//! offline use.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{AssistError, AssistResult};

/// Shape the reply should take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// A JSON document (`application/json`).
    Json,
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Requested reply format.
    #[serde(default)]
    pub format: ResponseFormat,
    /// Model identifier; `None` lets the collaborator pick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Create a free-text request.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
            model: None,
        }
    }

    /// Ask for a JSON reply.
    pub fn json(mut self) -> Self {
        self.format = ResponseFormat::Json;
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Something that turns prompts into text.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Provider name (e.g., "gemini", "scripted").
    fn name(&self) -> &str;

    /// Generate a reply.
    async fn generate(&self, request: GenerateRequest) -> AssistResult<String>;
}

/// Collaborator that replays queued replies in order.
///
/// Every request is recorded so tests can inspect the prompts that were sent.
#[derive(Debug, Default)]
pub struct ScriptedCollaborator {
    replies: Mutex<VecDeque<AssistResult<String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with replies queued up front.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let this = Self::new();
        for reply in replies {
            this.push_reply(reply);
        }
        this
    }

    /// Queue a successful reply.
    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.lock().push_back(Ok(reply.into()));
    }

    /// Queue a failure.
    pub fn push_failure(&self, error: AssistError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> AssistResult<String> {
        tracing::debug!(format = ?request.format, prompt_len = request.prompt.len(), "scripted generate");
        self.requests.lock().push(request);
        self.replies.lock().pop_front().unwrap_or(Err(AssistError::Exhausted))
    }
}
