//! Request routing for microroute.
//!
//! This module provides the route table: routes are kept in precedence order
//! (literal patterns, then parameterized patterns, then root-level parameters)
//! and each request is dispatched to the first route whose method and path
//! segments match.

mod params;
mod route;
mod table;
mod tests;

// Re-export public items
pub use params::Params;
pub use route::{compare_patterns, path_segments, Route, RouteInfo, Segment, ANY_METHOD};
pub use table::{not_found, HandlerFn, RouteMatch, RouteTable};
