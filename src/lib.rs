//! A minimal HTTP request router.
//!
//! Routes are matched segment by segment against the request path. A pattern
//! segment is either a literal (`users`), a parameter (`:id`, or `{id}` through
//! [`Mux`]), or a prefix literal (`files...`). A pattern ending in `/` or `...`
//! also matches longer paths.
//!
//! Routes are kept in precedence order, so the most specific route wins no
//! matter the order they were registered in:
//!
//! 1. literal-only patterns, alphabetically (case-insensitive),
//! 2. patterns with parameters below the root, such as `/posts/:id`,
//! 3. root-level parameters such as `/:slug`.
//!
//! # Examples
//!
//! ## Route table
//!
//! ```
//! use microroute::{HttpRequest, HttpResponse, Method, RouteTable};
//!
//! let mut table: RouteTable = RouteTable::new();
//! table.handle("GET", "/:slug", |res: &mut HttpResponse, req: &HttpRequest| {
//!     res.write_str(&format!("page {}", req.param("slug")));
//! });
//! table.handle("GET", "/about", |res: &mut HttpResponse, _req: &HttpRequest| {
//!     res.write_str("about us");
//! });
//!
//! let mut res = HttpResponse::default();
//! table.dispatch(&mut res, HttpRequest::new(Method::GET, "/about"));
//! assert_eq!(res.body_string(), "about us");
//!
//! let mut res = HttpResponse::default();
//! table.dispatch(&mut res, HttpRequest::new(Method::GET, "/contact"));
//! assert_eq!(res.body_string(), "page contact");
//! ```
//!
//! ## Mux
//!
//! ```
//! use microroute::{HttpRequest, HttpResponse, Method, Mux, StatusCode, StatusError};
//!
//! let mut mux = Mux::new();
//! mux.get("/users/{id}", |res, req| {
//!     let id: u32 = req
//!         .param("id")
//!         .parse()
//!         .map_err(|e| StatusError::with_cause(StatusCode::BadRequest, e))?;
//!     res.write_str(&format!("user {id}"));
//!     Ok(())
//! });
//!
//! let mut res = HttpResponse::default();
//! mux.serve(&mut res, HttpRequest::new(Method::GET, "/users/abc"));
//! assert_eq!(res.status, StatusCode::BadRequest);
//! ```
//!
//! See `demos/router_server.rs` for a server built on a `Mux`.

pub mod mux;
pub mod parser;
pub mod router;
pub mod server;

// Re-export commonly used items for convenience
pub use mux::{Mux, StatusError};
pub use parser::{parse_request, Error as ParserError, HttpRequest, HttpVersion, Method};
pub use router::{HandlerFn, Params, RouteTable};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
