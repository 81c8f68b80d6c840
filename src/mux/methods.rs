//! Per-method registration helpers.

use crate::mux::error::StatusError;
use crate::mux::router::Mux;
use crate::parser::{HttpRequest, Method};
use crate::router::ANY_METHOD;
use crate::server::HttpResponse;

macro_rules! method_helpers {
    ($($(#[$doc:meta])* $name:ident => $method:expr;)*) => {
        impl Mux {
            $(
                $(#[$doc])*
                pub fn $name<F>(&mut self, path: &str, handler: F)
                where
                    F: Fn(&mut HttpResponse, &HttpRequest) -> Result<(), StatusError>
                        + Send
                        + Sync
                        + 'static,
                {
                    self.handle($method, path, handler);
                }
            )*
        }
    };
}

method_helpers! {
    /// Register a `GET` handler.
    get => Method::GET.as_str();
    /// Register a `POST` handler.
    post => Method::POST.as_str();
    /// Register a `PUT` handler.
    put => Method::PUT.as_str();
    /// Register a `PATCH` handler.
    patch => Method::PATCH.as_str();
    /// Register a `DELETE` handler.
    delete => Method::DELETE.as_str();
    /// Register a `HEAD` handler.
    head => Method::HEAD.as_str();
    /// Register an `OPTIONS` handler.
    options => Method::OPTIONS.as_str();
    /// Register a handler for every method.
    any => ANY_METHOD;
}
