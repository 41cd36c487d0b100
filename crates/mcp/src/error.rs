use thiserror::Error;

use shopdesk_core::DomainError;

/// Failure of a tool invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The subprocess could not be spawned, exited, stalled past the timeout,
    /// or its pipes failed.
    #[error("tool server unavailable: {0}")]
    Unavailable(String),

    /// The tool ran and reported a failure (`isError: true`).
    #[error("tool failed ({code}): {message}")]
    Failed { code: String, message: String },

    /// The peer sent something that is not a valid protocol message.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ToolError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    pub fn protocol(reason: impl Into<String>) -> Self {
        Self::Protocol(reason.into())
    }

    /// Whether the session that produced this error can no longer be trusted.
    pub fn poisons_session(&self) -> bool {
        matches!(self, ToolError::Unavailable(_) | ToolError::Protocol(_))
    }
}

impl From<ToolError> for DomainError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Failed { code, message } if code == "not_found" => {
                DomainError::not_found(message)
            }
            ToolError::Failed { code, message } if code == "invalid_argument" => {
                DomainError::validation("arguments", message)
            }
            other => DomainError::unavailable(other.to_string()),
        }
    }
}
