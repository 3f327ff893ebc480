//! HTTP transport abstraction.
//!
//! A [`Transport`] performs exactly one authenticated round trip and hands the
//! raw status and body back to the caller. It never treats a non-2xx status
//! as a failure; only connection-level problems surface as
//! [`TransportError`]. The production implementation is [`HttpTransport`];
//! tests drive the resource layer through
//! [`crate::test_support::ScriptedTransport`].

use std::future::Future;
use std::pin::Pin;

use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

mod http;

pub use http::{HttpTransport, USER_AGENT};

/// One request as handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Fully qualified URL.
    pub url: String,
    /// JSON body sent with the request.
    pub body: Value,
}

impl HttpRequest {
    /// Creates a request for `url` carrying `body`.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>, body: Value) -> Self {
        Self {
            method,
            url: url.into(),
            body,
        }
    }
}

/// Raw response returned by a [`Transport`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub text: String,
}

impl HttpResponse {
    /// Creates a response from a status code and body text.
    #[must_use]
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// Returns `true` when the appliance answered 200. Other 2xx codes are
    /// not considered success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Decodes the body as JSON. An empty body decodes to `null`.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        if self.text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.text)
    }
}

/// Connection-level failure reported by a [`Transport`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{message}")]
pub struct TransportError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl TransportError {
    /// Creates an error from any displayable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Abstraction over the HTTP stack to support fakes in tests.
pub trait Transport: Send + Sync {
    /// Sends `request` and resolves to the raw response.
    fn send<'a>(&'a self, request: &'a HttpRequest) -> TransportFuture<'a>;
}

#[cfg(test)]
mod tests;
