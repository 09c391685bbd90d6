//! Blocking client for the feedly v3 REST API.
//!
//! # Overview
//! Every endpoint method is a one-line call into `Client::request_with_object`,
//! which converts params, sends the request over a shared connection, turns
//! failures into [`Error`] and maps the decoded body into a [`DomainResult`].
//!
//! # Design
//! - `Client` is bound to one endpoint (production, sandbox or an explicit
//!   override) for its lifetime and opens its connection on first use.
//! - Requests are built as plain `HttpRequest` data before they are sent, so
//!   what goes on the wire can be inspected without I/O.
//! - Response bodies are decoded by Content-Type alone: JSON, XML or text.
//! - No retries, caching or pagination; every failure reaches the caller.

pub mod client;
pub mod connection;
pub mod error;
pub mod factory;
mod gateway;
pub mod http;
pub mod payload;
pub mod types;

pub use client::{Client, ClientBuilder};
pub use connection::{ClientConfig, API_VERSION, ENDPOINT, MAX_BODY_SIZE, SANDBOX_ENDPOINT, USER_AGENT};
pub use error::{Error, Result};
pub use factory::{DomainResult, Resource};
pub use http::{Body, HttpMethod, HttpRequest, NormalizedResponse, RequestSpec};
pub use payload::Payload;
pub use types::{Tag, Webhook};

/// Version of this crate, embedded in the User-Agent header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
