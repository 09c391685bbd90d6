//! Error types for the feed API client.
//!
//! # Design
//! Every failure the gateway can produce lands in one of four variants.
//! Transport failures are classified here from `ureq::Error`; HTTP failures
//! are produced from a normalized response whose status is 400 or above.
//! Nothing in the crate retries or suppresses an error.

use std::io;

use thiserror::Error;

use crate::http::Body;

/// Errors returned by every `Client` call.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input had a shape that cannot be sent as `target`
    /// (`payload`, `params` or `body`).
    #[error("{value} to {target}")]
    TypeConversion { value: String, target: &'static str },

    /// The connect timeout or the overall request timeout fired.
    #[error("request timed out: {0}")]
    RequestTimeout(String),

    /// Transport failure (connection refused, DNS, malformed request) or a
    /// response body that does not parse as its declared media type.
    #[error("{0}")]
    Client(String),

    /// The server answered with a status of 400 or above. `body` is the
    /// decoded error payload.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: Body },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn type_conversion(value: &serde_json::Value, target: &'static str) -> Self {
        Error::TypeConversion {
            value: value.to_string(),
            target,
        }
    }

    /// HTTP status carried by an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Map a transport failure onto the error taxonomy. Timeouts are checked
/// first so they never surface as a generic client error.
pub(crate) fn classify_transport(err: ureq::Error) -> Error {
    let timed_out = match &err {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(io_err) => io_err.kind() == io::ErrorKind::TimedOut,
        _ => false,
    };
    if timed_out {
        Error::RequestTimeout(err.to_string())
    } else {
        Error::Client(err.to_string())
    }
}
