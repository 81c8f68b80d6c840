//! Conversion from brace-style path parameters.

/// Rewrite `{name}` segments as `:name`.
///
/// Only whole segments are converted; braces inside a segment are kept
/// verbatim, as are the slashes around segments.
pub fn brace_to_colon(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => format!(":{name}"),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
