//! HTTP request parsing and representation.

use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;
use crate::router::Params;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// An HTTP request as seen by handlers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// The request target, including any query string
    pub path: String,
    pub version: HttpVersion,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Query parameters parsed from the path
    pub query_params: HashMap<String, String>,
    params: Params,
}

impl HttpRequest {
    /// Create a request with no headers and an empty body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let query_params = parse_query(&path);

        Self {
            method,
            path,
            version: HttpVersion::default(),
            headers: HashMap::new(),
            body: Vec::new(),
            query_params,
            params: Params::new(),
        }
    }

    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Attach the path parameters bound by the router.
    ///
    /// Any earlier bindings are replaced.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// The percent-decoded path without its query string, as used for routing.
    ///
    /// Invalid UTF-8 produced by decoding is replaced with U+FFFD.
    pub fn route_path(&self) -> Cow<'_, str> {
        let raw = self
            .path
            .split_once('?')
            .map_or(self.path.as_str(), |(path, _)| path);
        percent_decode_str(raw).decode_utf8_lossy()
    }

    /// Get a path parameter bound by the router.
    ///
    /// Returns an empty string if the parameter was not bound.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Get a header value, ignoring the case of the name.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Parse the body as JSON.
    ///
    /// Fails unless the `Content-Type` header is `application/json`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }

        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn is_json(&self) -> bool {
        self.get_header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }

    pub fn get_query_param(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }
}

fn parse_query(path: &str) -> HashMap<String, String> {
    path.split_once('?')
        .map(|(_, query)| {
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => (k.to_string(), v.to_string()),
                    None => (pair.to_string(), String::new()),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Split `input` at the blank line that ends the header section.
fn split_head(input: &[u8]) -> Option<(&[u8], &[u8])> {
    input
        .windows(HEAD_TERMINATOR.len())
        .position(|window| window == HEAD_TERMINATOR)
        .map(|end| (&input[..end], &input[end + HEAD_TERMINATOR.len()..]))
}

fn parse_content_length(value: &str) -> Result<usize, Error> {
    let value = value.trim();
    value
        .parse()
        .map_err(|_| Error::InvalidContentLength(value.to_string()))
}

/// The length in bytes of the request at the start of `input`: the header
/// section, the blank line and `Content-Length` bytes of body.
///
/// Returns `None` while the header section is still incomplete.
pub fn request_length(input: &[u8]) -> Result<Option<usize>, Error> {
    let Some((head, _)) = split_head(input) else {
        return Ok(None);
    };

    let declared = String::from_utf8_lossy(head)
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
        .map(|(_, value)| parse_content_length(value))
        .transpose()?
        .unwrap_or(0);

    Ok(Some(head.len() + HEAD_TERMINATOR.len() + declared))
}

/// Parse an HTTP request from a byte slice.
///
/// The body is the `Content-Length` bytes following the header section; a
/// request without that header has an empty body. Fails if fewer bytes than
/// declared are present.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, body) = split_head(input).unwrap_or((input, &[][..]));

    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    let mut lines = head.lines();

    let request_line = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(Error::EmptyRequest)?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let &[method, path, version] = parts.as_slice() else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    let method = Method::from_str(method)?;
    if !path.starts_with('/') && path != "*" {
        return Err(Error::InvalidPath);
    }
    let version = HttpVersion::from_str(version)?;

    let mut request = HttpRequest::new(method, path).with_version(version);
    for line in lines.take_while(|line| !line.is_empty()) {
        let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
        request = request.with_header(name.trim(), value.trim());
    }

    if version == HttpVersion::Http11 && !request.has_header("Host") {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let declared = match request.get_header("Content-Length") {
        Some(value) => parse_content_length(value)?,
        None => 0,
    };
    if body.len() < declared {
        return Err(Error::IncompleteBody {
            expected: declared,
            received: body.len(),
        });
    }

    Ok(request.with_body(&body[..declared]))
}
