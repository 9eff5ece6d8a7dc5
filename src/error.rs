//! Error types for the reconciliation pipeline and its transport

use thiserror::Error;

/// User-visible message for any transport failure.
pub const TRANSPORT_MESSAGE: &str = "Failed to fetch data from sensors. Please try again later.";

/// Failures that end a fetch cycle.
///
/// Malformed payloads and invalid records are never represented here; they
/// degrade to empty or partial data inside the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Network failure or unreadable response body
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Nothing survived validation
    #[error("no data available")]
    EmptyResult,

    /// Token outside the configured time-scale set
    #[error("unsupported time scale: {0}")]
    UnsupportedTimeScale(String),
}

impl PipelineError {
    /// Network and status failures, reported together to the user.
    pub fn is_transport(&self) -> bool {
        matches!(self, PipelineError::Transport(_) | PipelineError::Status(_))
    }

    /// Message shown in the error banner.
    pub fn user_message(&self) -> String {
        if self.is_transport() {
            TRANSPORT_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => PipelineError::Status(status.as_u16()),
            None => PipelineError::Transport(e.to_string()),
        }
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(PipelineError::Transport("reset".into()).is_transport());
        assert!(PipelineError::Status(503).is_transport());
        assert!(!PipelineError::EmptyResult.is_transport());
        assert!(!PipelineError::UnsupportedTimeScale("2h".into()).is_transport());
    }

    #[test]
    fn test_user_messages_are_distinct() {
        assert_eq!(PipelineError::EmptyResult.user_message(), "no data available");
        assert_eq!(PipelineError::Status(500).user_message(), TRANSPORT_MESSAGE);
        assert_ne!(
            PipelineError::EmptyResult.user_message(),
            PipelineError::Transport("x".into()).user_message()
        );
    }
}
