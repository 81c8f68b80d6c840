//! The route table: ordered registration, removal and dispatch.

use std::sync::Arc;

use log::{debug, trace};

use crate::parser::HttpRequest;
use crate::router::params::Params;
use crate::router::route::{path_segments, Route, RouteInfo};
use crate::server::{HttpResponse, StatusCode};

/// Type alias for a handler that writes into a response for a request.
pub type HandlerFn = Arc<dyn Fn(&mut HttpResponse, &HttpRequest) + Send + Sync>;

/// The route chosen for a request, together with its bound parameters.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub route: &'a Route<H>,
    pub params: Params,
}

/// An ordered table of routes.
///
/// The table is kept sorted by [`Route::precedence`] after every registration
/// and dispatch takes the first route that matches. Mutation needs `&mut self`,
/// so a table shared behind an `Arc` is read-only while it serves.
pub struct RouteTable<H = HandlerFn> {
    routes: Vec<Route<H>>,
    not_found: HandlerFn,
}

impl<H> RouteTable<H> {
    /// Create an empty table with the default not-found handler.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            not_found: Arc::new(not_found),
        }
    }

    /// Register a handler for a method and pattern.
    ///
    /// The method may be any HTTP method, in any case, or `*` to match every
    /// method. A pattern ending in `/` or `...` acts as a prefix. Duplicate
    /// registrations are kept; the earlier one wins at dispatch.
    pub fn register(&mut self, method: &str, pattern: impl Into<String>, handler: H) {
        let route = Route::new(method, pattern, handler);
        debug!("Registered route {} {}", route.method(), route.pattern());
        self.routes.push(route);
        self.routes.sort_by(Route::precedence);
    }

    /// Remove every route registered under `method` and `pattern`.
    ///
    /// Returns the number of routes removed.
    pub fn remove(&mut self, method: &str, pattern: &str) -> usize {
        let before = self.routes.len();
        self.routes.retain(|route| !route.is_keyed(method, pattern));
        let removed = before - self.routes.len();
        debug!("Removed {removed} route(s) for {method} {pattern}");
        removed
    }

    /// The number of registered routes.
    pub fn count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over the routes in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    /// Summaries of the routes in dispatch order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(Route::info).collect()
    }

    /// Replace the handler invoked when no route matches.
    pub fn set_not_found<F>(&mut self, handler: F)
    where
        F: Fn(&mut HttpResponse, &HttpRequest) + Send + Sync + 'static,
    {
        self.not_found = Arc::new(handler);
    }

    /// Find the first route matching a method and path.
    ///
    /// `path` is matched as given; [`dispatch_with`](Self::dispatch_with)
    /// passes the request's percent-decoded [`HttpRequest::route_path`].
    pub fn lookup(&self, method: &str, path: &str) -> Option<RouteMatch<'_, H>> {
        let method = method.to_lowercase();
        let segments = path_segments(path);

        self.routes
            .iter()
            .filter(|route| route.accepts_method(&method))
            .find_map(|route| {
                route
                    .match_segments(&segments)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// Dispatch a request, letting `invoke` call the matched handler.
    ///
    /// The bound parameters are attached to the request before `invoke` runs.
    /// If nothing matches, the not-found handler runs instead.
    pub fn dispatch_with<F>(&self, res: &mut HttpResponse, req: HttpRequest, invoke: F)
    where
        F: FnOnce(&H, &mut HttpResponse, &HttpRequest),
    {
        let method = req.method.as_str();
        let found = self.lookup(method, &req.route_path());
        match found {
            Some(RouteMatch { route, params }) => {
                trace!("{method} {} matched {}", req.path, route.pattern());
                let req = req.with_params(params);
                invoke(route.handler(), res, &req);
            }
            None => {
                trace!("{method} {} matched no route", req.path);
                (self.not_found)(res, &req);
            }
        }
    }
}

impl RouteTable<HandlerFn> {
    /// Register a closure as the handler for a method and pattern.
    pub fn handle<F>(&mut self, method: &str, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut HttpResponse, &HttpRequest) + Send + Sync + 'static,
    {
        self.register(method, pattern, Arc::new(handler));
    }

    /// Dispatch a request to the matching handler or to the not-found handler.
    pub fn dispatch(&self, res: &mut HttpResponse, req: HttpRequest) {
        self.dispatch_with(res, req, |handler, res, req| handler(res, req));
    }
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// The default not-found handler.
pub fn not_found(res: &mut HttpResponse, _req: &HttpRequest) {
    res.set_status(StatusCode::NotFound);
    res.set_header("Content-Type", "text/plain; charset=utf-8");
    res.write_str("404 page not found\n");
}
