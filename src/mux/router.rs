//! The `Mux`: error-returning handlers on top of the route table.

use std::sync::Arc;

use log::debug;

use crate::mux::convert::brace_to_colon;
use crate::mux::error::StatusError;
use crate::parser::HttpRequest;
use crate::router::{RouteInfo, RouteTable};
use crate::server::{HttpResponse, StatusCode};

/// Type alias for a handler that may fail with a status.
pub type MuxHandlerFn =
    Arc<dyn Fn(&mut HttpResponse, &HttpRequest) -> Result<(), StatusError> + Send + Sync>;

/// Type alias for the callback that reports handler errors.
pub type ErrorHandlerFn = Arc<dyn Fn(&mut HttpResponse, &HttpRequest, &StatusError) + Send + Sync>;

/// A request router whose handlers return `Result<(), StatusError>`.
///
/// Patterns may use `{name}` or `:name` for parameters. Errors returned by
/// handlers go to the error handler set with [`Mux::set_error_handler`], which
/// is looked up when the error happens, not when the route was registered.
pub struct Mux {
    table: RouteTable<MuxHandlerFn>,
    error_handler: Option<ErrorHandlerFn>,
}

impl Mux {
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            error_handler: None,
        }
    }

    /// Set the callback that receives handler errors.
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&mut HttpResponse, &HttpRequest, &StatusError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
    }

    /// Set the handler called when no route matches.
    pub fn set_not_found<F>(&mut self, handler: F)
    where
        F: Fn(&mut HttpResponse, &HttpRequest) + Send + Sync + 'static,
    {
        self.table.set_not_found(handler);
    }

    /// Register a handler for a method and path.
    ///
    /// `method` is any HTTP method or `*` for all methods.
    pub fn handle<F>(&mut self, method: &str, path: &str, handler: F)
    where
        F: Fn(&mut HttpResponse, &HttpRequest) -> Result<(), StatusError> + Send + Sync + 'static,
    {
        self.table.register(method, brace_to_colon(path), Arc::new(handler));
    }

    /// Remove every route registered for a method and path.
    ///
    /// The path uses the same syntax it was registered with. Returns the
    /// number of routes removed.
    pub fn clear(&mut self, method: &str, path: &str) -> usize {
        self.table.remove(method, &brace_to_colon(path))
    }

    pub fn count(&self) -> usize {
        self.table.count()
    }

    /// Summaries of the registered routes in dispatch order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.routes()
    }

    /// Route a request and run the matching handler.
    pub fn serve(&self, res: &mut HttpResponse, req: HttpRequest) {
        self.table.dispatch_with(res, req, |handler, res, req| {
            if let Err(err) = handler(res, req) {
                debug!("Handler for {} {} failed with {}", req.method, req.path, err.status);
                self.report(res, req, &err);
            }
        });
    }

    /// Build an error with a status and an optional cause.
    pub fn status_error(
        &self,
        status: StatusCode,
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> StatusError {
        StatusError {
            source: cause,
            ..StatusError::new(status)
        }
    }

    /// Respond with a bare status through the error handler.
    ///
    /// Without an error handler the reason phrase is written as the body.
    pub fn error(&self, status: StatusCode, res: &mut HttpResponse, req: &HttpRequest) {
        match &self.error_handler {
            Some(handler) => handler(res, req, &StatusError::new(status)),
            None => write_error(res, status, status.reason_phrase()),
        }
    }

    /// Get a path parameter from a routed request, or an empty string.
    pub fn param<'a>(&self, req: &'a HttpRequest, name: &str) -> &'a str {
        req.param(name)
    }

    /// Adapt a handler that cannot fail.
    pub fn wrap<F>(
        handler: F,
    ) -> impl Fn(&mut HttpResponse, &HttpRequest) -> Result<(), StatusError> + Send + Sync + 'static
    where
        F: Fn(&mut HttpResponse, &HttpRequest) + Send + Sync + 'static,
    {
        move |res: &mut HttpResponse, req: &HttpRequest| {
            handler(res, req);
            Ok(())
        }
    }

    fn report(&self, res: &mut HttpResponse, req: &HttpRequest, err: &StatusError) {
        match &self.error_handler {
            Some(handler) => handler(res, req, err),
            None => write_error(res, err.status, &err.to_string()),
        }
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the response with a plain-text error.
pub fn write_error(res: &mut HttpResponse, status: StatusCode, message: &str) {
    res.set_status(status);
    res.set_header("Content-Type", "text/plain; charset=utf-8");
    res.set_header("X-Content-Type-Options", "nosniff");
    res.body.clear();
    res.write_str(message);
    res.write_str("\n");
}
