//! HTTP request and response types for the gateway pipeline.
//!
//! # Design
//! A call goes through three plain-data shapes: the caller's `RequestSpec`,
//! the fully resolved `HttpRequest` that `Client::build_request` produces, and
//! the `NormalizedResponse` the executor hands back after decoding. Keeping the
//! built request as data means what will be sent can be inspected and tested
//! without touching the network.

use std::fmt;

use serde_json::Value;
use xmltree::Element;

use crate::error::{Error, Result};
use crate::payload;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET and DELETE carry their params in the query string; POST and PUT
    /// carry them in the body.
    pub fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an endpoint method asks the gateway to do.
///
/// `path` is the resource path without the API version prefix and must start
/// with `/`. `params` may be any JSON value; whether it is acceptable depends
/// on the method (see [`crate::payload`]).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub params: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Content-Type supplied by the caller, if any.
    pub fn content_type(&self) -> Option<&str> {
        find_header(&self.headers, "content-type")
    }
}

/// A fully resolved HTTP request described as plain data.
///
/// `url` already includes the endpoint and the API version prefix. `query`
/// is empty for POST/PUT and `body` is `None` for GET/DELETE. A query pair
/// with no value is sent as a bare key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, Option<String>)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// `url` with the form-encoded query string appended.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        format!("{}?{}", self.url, payload::form_encode(&self.query))
    }
}

/// A response body after content-type driven decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No content, or only whitespace.
    Empty,
    Json(Value),
    Xml(Element),
    Text(String),
}

impl Body {
    /// Decode `raw` according to the response's Content-Type header.
    ///
    /// A body that claims to be JSON or XML but does not parse is a
    /// `Client` error.
    pub fn decode(content_type: Option<&str>, raw: String) -> Result<Body> {
        if raw.trim().is_empty() {
            return Ok(Body::Empty);
        }
        match content_type.map(media_type) {
            Some(mt) if is_word_suffix(&mt, "json") => {
                serde_json::from_str(&raw)
                    .map(Body::Json)
                    .map_err(|e| Error::Client(e.to_string()))
            }
            Some(mt) if is_word_suffix(&mt, "xml") => {
                Element::parse(raw.as_bytes())
                    .map(Body::Xml)
                    .map_err(|e| Error::Client(e.to_string()))
            }
            _ => Ok(Body::Text(raw)),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => Ok(()),
            Body::Json(value) => write!(f, "{value}"),
            Body::Xml(element) => {
                let mut out = Vec::new();
                element.write(&mut out).map_err(|_| fmt::Error)?;
                f.write_str(&String::from_utf8_lossy(&out))
            }
            Body::Text(text) => f.write_str(text),
        }
    }
}

/// An HTTP response after decoding. Never represents a failed status when
/// returned from the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl NormalizedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Media type without parameters, lowercased: `Application/JSON; charset=utf-8`
/// becomes `application/json`.
pub(crate) fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a Content-Type names a JSON media type (`*/json` or `*+json`).
pub(crate) fn is_json(content_type: &str) -> bool {
    is_word_suffix(&media_type(content_type), "json")
}

// `suffix` must end the media type and start right after a non-alphanumeric
// character, so `application/json` and `application/ld+json` match but
// `application/notjson` does not.
fn is_word_suffix(media_type: &str, suffix: &str) -> bool {
    match media_type.strip_suffix(suffix) {
        Some(head) => head.chars().last().is_some_and(|c| !c.is_ascii_alphanumeric()),
        None => false,
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
