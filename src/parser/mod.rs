//! HTTP request model and parser.
//!
//! Handlers receive an [`HttpRequest`]; the router attaches the bound path
//! parameters to it before the handler runs.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::{parse_request, request_length, HttpRequest};
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;
