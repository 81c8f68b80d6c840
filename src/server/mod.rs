//! HTTP server for microroute.
//!
//! This module provides the response type handlers write into and a tokio
//! based server that parses requests and hands them to a [`Mux`](crate::mux::Mux).

mod response;
mod config;
mod error;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
