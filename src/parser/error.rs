//! Error types for request parsing.

use thiserror::Error;

/// Errors that can occur while parsing a request.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid HTTP path")]
    InvalidPath,

    /// The request line does not have exactly three parts.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    #[error("Required header is missing: {0}")]
    MissingHeader(String),

    #[error("Invalid header format")]
    InvalidHeaderFormat,

    #[error("Empty request")]
    EmptyRequest,

    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The connection ended before the declared body arrived.
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// The body was expected to be JSON and was not.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
