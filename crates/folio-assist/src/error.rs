//! Error types for collaborator calls.

use thiserror::Error;

/// Errors from asking the AI collaborator for help.
///
/// None of these mutate document state: a failed call leaves the session
/// exactly as it was.
#[derive(Error, Debug)]
pub enum AssistError {
    /// Provider not configured or unavailable.
    #[error("provider not available: {0}")]
    Unavailable(String),

    /// Provider answered with an error.
    #[error("api error: {0}")]
    Api(String),

    /// Transport failed.
    #[error("network error: {0}")]
    Network(String),

    /// Provider answered, but not in the requested shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A scripted collaborator ran out of replies.
    #[error("collaborator has no more replies")]
    Exhausted,

    /// Nothing to send.
    #[error("instruction is empty")]
    EmptyInstruction,

    /// A configured intent pattern did not compile.
    #[error("invalid intent pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl AssistError {
    /// True for failures on the collaborator's side of the call.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            AssistError::Unavailable(_)
                | AssistError::Api(_)
                | AssistError::Network(_)
                | AssistError::MalformedResponse(_)
                | AssistError::Exhausted
        )
    }
}

/// Result type for collaborator calls.
pub type AssistResult<T> = Result<T, AssistError>;
