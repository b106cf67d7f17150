//! Model gateway port for chat-completion calls.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Boxed future type alias used by [`ModelGateway`] to keep the trait dyn-compatible.
pub type GatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, GatewayError>> + Send + 'a>>;

/// One chat-completion call: fixed instructions plus per-request data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCall {
    /// Human-readable stage label, used in logs and error messages.
    pub label: String,
    /// System message (fixed instructions).
    pub system: String,
    /// User message (rendered project data).
    pub user: String,
}

/// A failed model call.
///
/// Carries the upstream status and body when the endpoint answered at all, so
/// callers can surface them for diagnosis. Serializable so that recorded
/// failures replay faithfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{label} failed: {message}")]
pub struct GatewayError {
    /// Stage label of the failed call.
    pub label: String,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Response body, when a response was received.
    pub body: Option<String>,
    /// Short description of the failure.
    pub message: String,
}

impl GatewayError {
    /// A failure before any HTTP status was available (connect, DNS, timeout).
    pub fn transport(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self { label: label.into(), status: None, body: None, message: message.into() }
    }

    /// A non-2xx answer from the endpoint.
    pub fn upstream(label: impl Into<String>, status: u16, body: String) -> Self {
        Self {
            label: label.into(),
            status: Some(status),
            body: Some(body),
            message: format!("upstream returned HTTP {status}"),
        }
    }
}

/// Sends prompts to a chat-completion endpoint.
///
/// Implementations never retry; a failure is reported immediately.
pub trait ModelGateway: Send + Sync {
    /// Performs one call and returns the raw response envelope.
    ///
    /// A response body that is not JSON comes back as a JSON string value.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on network failure, timeout, or non-2xx status.
    fn call(&self, call: &ModelCall) -> GatewayFuture<'_>;
}
