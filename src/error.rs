//! Error types for the znstor client.

use serde_json::Value;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by resource operations against the appliance.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ZnstorError {
    /// Raised when a required object is absent on the appliance.
    #[error("object not found. object {object}, debug: {debug}, payload: {}", describe_payload(.payload))]
    NotFound {
        /// Resource path that was queried.
        object: String,
        /// Diagnostic text describing the miss.
        debug: String,
        /// Request payload, when one was sent.
        payload: Option<Value>,
    },
    /// Raised for every response whose status is not 200.
    #[error("bad request. object {object}, debug: {debug}, payload: {}", describe_payload(.payload))]
    BadRequest {
        /// Resource path the request was sent to.
        object: String,
        /// Raw response text returned by the appliance.
        debug: String,
        /// Request payload, when one was sent.
        payload: Option<Value>,
    },
    /// Raised when the HTTP round trip itself fails.
    #[error("transport error on {path}: {message}")]
    Transport {
        /// Resource path the request was sent to.
        path: String,
        /// Error reported by the HTTP stack.
        message: String,
    },
    /// Raised when a successful response carries a body that is not JSON.
    #[error("failed to decode response from {path}: {message}")]
    Decode {
        /// Resource path the request was sent to.
        path: String,
        /// Decoder error message.
        message: String,
    },
    /// Raised when the client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn describe_payload(payload: &Option<Value>) -> String {
    payload
        .as_ref()
        .map_or_else(|| String::from("None"), Value::to_string)
}
