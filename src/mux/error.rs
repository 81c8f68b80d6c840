//! Handler errors carrying an HTTP status.

use thiserror::Error;

use crate::server::StatusCode;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by a handler, with the status to respond with.
///
/// Displays as the underlying cause, or as an empty string when there is none.
#[derive(Debug, Error)]
#[error("{}", .source.as_ref().map(ToString::to_string).unwrap_or_default())]
pub struct StatusError {
    pub status: StatusCode,
    #[source]
    pub source: Option<Cause>,
    /// An optional message that is safe to show to users.
    pub friendly: Option<String>,
}

impl StatusError {
    /// An error with a status and no cause.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            source: None,
            friendly: None,
        }
    }

    /// An error with a status and an underlying cause.
    pub fn with_cause(status: StatusCode, cause: impl Into<Cause>) -> Self {
        Self {
            source: Some(cause.into()),
            ..Self::new(status)
        }
    }

    pub fn with_friendly(mut self, message: impl Into<String>) -> Self {
        self.friendly = Some(message.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The user-facing message, or an empty string.
    pub fn message(&self) -> &str {
        self.friendly.as_deref().unwrap_or("")
    }
}

impl From<StatusCode> for StatusError {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}
