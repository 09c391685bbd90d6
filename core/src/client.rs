//! Blocking client for the feed API and the gateway every endpoint goes through.
//!
//! # Design
//! `Client` owns its `ClientConfig` and a lazily opened `Connection`. A call
//! is split into `build_request`, which turns a `RequestSpec` into a plain
//! `HttpRequest` (params converted by method, headers merged over the
//! defaults), and `execute`, which sends it and turns any status of 400 or
//! above into an error. `request_with_object` adds the response factory on
//! top and is the single entry point the endpoint methods use.

use std::fmt;
use std::sync::OnceLock;

use crate::connection::{ClientConfig, Connection, ENDPOINT, SANDBOX_ENDPOINT};
use crate::error::{Error, Result};
use crate::factory::{self, DomainResult};
use crate::http::{is_json, HttpRequest, NormalizedResponse, RequestSpec};
use crate::payload;

/// Synchronous client for the feed API.
///
/// The endpoint is fixed when the client is built. The connection is opened
/// on the first request and reused for every later one; it is guarded by a
/// `OnceLock`, so sharing a client across threads is sound.
pub struct Client {
    config: ClientConfig,
    connection: OnceLock<Connection>,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Production client authenticated with `oauth_access_token`.
    pub fn new(oauth_access_token: impl Into<String>) -> Self {
        Self::builder().oauth_access_token(oauth_access_token).build()
    }

    /// Sandbox client authenticated with `oauth_access_token`.
    pub fn sandbox(oauth_access_token: impl Into<String>) -> Self {
        Self::builder()
            .oauth_access_token(oauth_access_token)
            .sandbox(true)
            .build()
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn connection(&self) -> &Connection {
        self.connection.get_or_init(|| Connection::open(&self.config))
    }

    /// Resolve `spec` into the request that would be sent, without sending it.
    ///
    /// GET/DELETE params must be a mapping and go into the query string.
    /// POST/PUT params are JSON-encoded unless the caller set a non-JSON
    /// Content-Type, in which case they are passed through as-is.
    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest> {
        if !spec.path.starts_with('/') {
            return Err(Error::Client(format!(
                "resource path must start with '/': {}",
                spec.path
            )));
        }
        let connection = self.connection();

        let mut query = Vec::new();
        let mut body = None;
        if let Some(params) = &spec.params {
            if spec.method.sends_body() {
                body = Some(match spec.content_type() {
                    Some(content_type) if !is_json(content_type) => payload::raw_body(params)?,
                    _ => payload::to_payload(params)?.to_json()?,
                });
            } else {
                query = payload::query_pairs(&payload::to_params(params)?);
            }
        }

        Ok(HttpRequest {
            method: spec.method,
            url: connection.url_for(&spec.path),
            query,
            headers: merge_headers(connection.default_headers(), &spec.headers),
            body,
        })
    }

    /// Build and send `spec`. A response with a failed status is returned as
    /// `Error::Http`, never as `Ok`.
    pub fn execute(&self, spec: &RequestSpec) -> Result<NormalizedResponse> {
        let request = self.build_request(spec)?;
        let response = self.connection().send(&request)?;
        check_status(response)
    }

    /// Run a request and map its body to a [`DomainResult`].
    pub fn request_with_object(&self, spec: RequestSpec) -> Result<DomainResult> {
        let response = self.execute(&spec)?;
        Ok(factory::create(response.body))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.config.endpoint)
            .field("authenticated", &self.config.oauth_access_token.is_some())
            .field("connected", &self.connection.get().is_some())
            .finish()
    }
}

/// Configures a [`Client`].
///
/// An explicit `endpoint` wins over the `sandbox` flag; it is meant for
/// proxies and local stubs.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    oauth_access_token: Option<String>,
    sandbox: bool,
    endpoint: Option<String>,
}

impl ClientBuilder {
    pub fn oauth_access_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_access_token = Some(token.into());
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn build(self) -> Client {
        let endpoint = match (self.endpoint, self.sandbox) {
            (Some(endpoint), _) => endpoint,
            (None, true) => SANDBOX_ENDPOINT.to_string(),
            (None, false) => ENDPOINT.to_string(),
        };
        Client {
            config: ClientConfig {
                endpoint,
                oauth_access_token: self.oauth_access_token,
            },
            connection: OnceLock::new(),
        }
    }
}

/// Per-call headers replace defaults of the same name.
fn merge_headers(defaults: &[(String, String)], overrides: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .filter(|(name, _)| !overrides.iter().any(|(o, _)| o.eq_ignore_ascii_case(name)))
        .cloned()
        .collect();
    merged.extend(overrides.iter().cloned());
    merged
}

fn check_status(response: NormalizedResponse) -> Result<NormalizedResponse> {
    if response.status >= 400 {
        return Err(Error::Http {
            status: response.status,
            body: response.body,
        });
    }
    Ok(response)
}
