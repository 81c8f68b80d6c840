//! Registered routes and segment matching.

use std::cmp::Ordering;

use serde::Serialize;

use crate::router::params::Params;

/// Method sentinel that matches every request method.
pub const ANY_METHOD: &str = "*";

const PARAM_MARKER: char = ':';
const PREFIX_MARKER: &str = "...";

/// Split a path or pattern into segments.
///
/// Leading and trailing slashes are trimmed first, so `/` and the empty path
/// both yield a single empty segment.
pub fn path_segments(path: &str) -> Vec<&str> {
    path.trim_matches('/').split('/').collect()
}

/// One component of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched verbatim, case-sensitive.
    Literal(String),
    /// `:name`, binds the request segment under `name`.
    Param(String),
    /// `stem...`, accepts the rest of the request once a segment starts with `stem`.
    Prefix(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(PARAM_MARKER) {
            Segment::Param(name.to_string())
        } else if let Some(stem) = raw.strip_suffix(PREFIX_MARKER) {
            Segment::Prefix(stem.to_string())
        } else {
            Segment::Literal(raw.to_string())
        }
    }
}

/// A registered route.
///
/// Routes are immutable once built; the table only ever adds, reorders and
/// drops them.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: String,
    method: String,
    segments: Vec<Segment>,
    prefix: bool,
    handler: H,
}

impl<H> Route<H> {
    /// Build a route from a method, a pattern and its handler.
    pub fn new(method: &str, pattern: impl Into<String>, handler: H) -> Self {
        let pattern = pattern.into();
        let segments = path_segments(&pattern).into_iter().map(Segment::parse).collect();
        let prefix = pattern.ends_with('/') || pattern.ends_with(PREFIX_MARKER);

        Self {
            method: method.to_lowercase(),
            segments,
            prefix,
            pattern,
            handler,
        }
    }

    /// The pattern exactly as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The lower-cased method, or `*`.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the request path may extend beyond this route's segments.
    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Check a lower-cased request method against this route.
    pub fn accepts_method(&self, method: &str) -> bool {
        self.method == ANY_METHOD || self.method == method
    }

    /// Check whether this route was registered under `method` and `pattern`.
    ///
    /// The method compares case-insensitively, the pattern exactly.
    pub fn is_keyed(&self, method: &str, pattern: &str) -> bool {
        self.pattern == pattern && self.method == method.to_lowercase()
    }

    /// Walk the route's segments against the request segments.
    ///
    /// Returns the bound parameters on a match.
    pub fn match_segments(&self, segments: &[&str]) -> Option<Params> {
        if segments.len() > self.segments.len() && !self.prefix {
            return None;
        }

        let mut params = Params::new();
        for (index, segment) in self.segments.iter().enumerate() {
            let value = *segments.get(index)?;
            match segment {
                Segment::Literal(literal) => {
                    if literal != value {
                        return None;
                    }
                }
                Segment::Prefix(stem) => {
                    return value.starts_with(stem.as_str()).then_some(params);
                }
                Segment::Param(name) => params.insert(name.as_str(), value),
            }
        }

        Some(params)
    }

    /// Precedence between two routes; the lesser route is tried first.
    pub fn precedence(&self, other: &Self) -> Ordering {
        compare_patterns(&self.pattern, &other.pattern)
    }

    /// A serializable summary of this route.
    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            method: self.method.clone(),
            pattern: self.pattern.clone(),
            prefix: self.prefix,
        }
    }
}

/// Summary of a registered route, used for listings and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
    pub prefix: bool,
}

/// Literal-only patterns first, then patterns with parameters below the root,
/// then root-level parameters such as `/:slug`.
fn specificity_rank(pattern: &str) -> u8 {
    if pattern.starts_with("/:") {
        2
    } else if pattern.contains(PARAM_MARKER) {
        1
    } else {
        0
    }
}

/// Total order over patterns: rank, then case-insensitive, then case-sensitive.
pub fn compare_patterns(a: &str, b: &str) -> Ordering {
    specificity_rank(a)
        .cmp(&specificity_rank(b))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}
