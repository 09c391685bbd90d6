//! The HTTP connection shared by every call on one client.
//!
//! # Design
//! A `Connection` pairs a ureq `Agent` (timeouts fixed at construction) with
//! the endpoint and default headers computed once from the client config. It
//! also executes built requests: transport errors are classified, the raw
//! exchange is logged at debug level, and the body is decoded by media type.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::error::{classify_transport, Result};
use crate::http::{find_header, Body, HttpMethod, HttpRequest, NormalizedResponse};

pub const ENDPOINT: &str = "http://cloud.feedly.com";
pub const SANDBOX_ENDPOINT: &str = "http://sandbox.feedly.com";
pub const API_VERSION: &str = "/v3";

pub const OPEN_TIMEOUT: Duration = Duration::from_secs(10);
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response body read into memory. OPML exports and stream pages of
/// large accounts run well past ureq's 10 MiB default.
pub const MAX_BODY_SIZE: u64 = 64 * 1024 * 1024;

pub const USER_AGENT: &str = concat!("feedlr-rs/", env!("CARGO_PKG_VERSION"));

/// Endpoint and credentials a client is bound to for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub oauth_access_token: Option<String>,
}

pub struct Connection {
    endpoint: String,
    headers: Vec<(String, String)>,
    agent: ureq::Agent,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

impl Connection {
    pub fn open(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(OPEN_TIMEOUT))
            .timeout_global(Some(TIMEOUT))
            .build()
            .new_agent();
        debug!(endpoint = %config.endpoint, "opening feed API connection");
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            headers: default_headers(config.oauth_access_token.as_deref()),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Full URL for a resource path: `<endpoint>/v3<path>`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{API_VERSION}{path}", self.endpoint)
    }

    /// Issue one HTTP call and decode the response. The status is not
    /// inspected here.
    pub fn send(&self, request: &HttpRequest) -> Result<NormalizedResponse> {
        debug!(
            method = %request.method,
            url = %request.url,
            query = ?request.query,
            body = request.body.as_deref().unwrap_or_default(),
            "feed API request"
        );

        let url = request.full_url();
        let sent = match request.method {
            HttpMethod::Get => prepare(self.agent.get(&url), request).call(),
            HttpMethod::Delete => prepare(self.agent.delete(&url), request).call(),
            HttpMethod::Post => {
                let builder = prepare(self.agent.post(&url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = prepare(self.agent.put(&url), request);
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = sent.map_err(classify_transport)?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let raw = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_string()
            .map_err(classify_transport)?;

        debug!(status, headers = ?headers, body = %raw, "feed API response");

        let content_type = find_header(&headers, "content-type");
        let body = Body::decode(content_type, raw)?;
        Ok(NormalizedResponse {
            status,
            headers,
            body,
        })
    }
}

fn prepare<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn default_headers(oauth_access_token: Option<&str>) -> Vec<(String, String)> {
    let mut headers = vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("Content-Type".to_string(), "application/json".to_string()),
        ("User-Agent".to_string(), USER_AGENT.to_string()),
    ];
    if let Some(token) = oauth_access_token {
        headers.push(("Authorization".to_string(), format!("OAuth {token}")));
    }
    headers
}
