//! Handler-facing router API.
//!
//! [`Mux`] wraps the route table with per-method registration, `{name}`
//! parameter syntax and handlers that return a [`StatusError`] on failure.

mod convert;
mod error;
mod methods;
mod router;

// Re-export public items
pub use convert::brace_to_colon;
pub use error::StatusError;
pub use router::{write_error, ErrorHandlerFn, Mux, MuxHandlerFn};
