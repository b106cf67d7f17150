//! Live adapter for the `ModelGateway` port using a chat-completion HTTP API.

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{ConfigError, DecodingParams, ModelConfig, API_KEY_VAR};
use crate::ports::gateway::{GatewayError, GatewayFuture, ModelCall, ModelGateway};
use crate::ports::IdGenerator;

/// Header carrying the per-call correlation identifier.
pub const REQUEST_ID_HEADER: &str = "X-NCP-CLOVASTUDIO-REQUEST-ID";

/// Live gateway that posts prompts to the configured endpoint.
pub struct LiveModelGateway {
    client: Client,
    config: ModelConfig,
    api_key: String,
    id_gen: Box<dyn IdGenerator>,
}

impl LiveModelGateway {
    /// Creates a gateway for `config`, using `id_gen` for correlation IDs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when no API key is configured, or
    /// [`ConfigError::HttpClient`] when the HTTP client cannot be built.
    pub fn new(config: ModelConfig, id_gen: Box<dyn IdGenerator>) -> Result<Self, ConfigError> {
        let api_key = config.api_key.clone().ok_or(ConfigError::Missing { key: API_KEY_VAR })?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config, api_key, id_gen })
    }
}

/// Request body sent to the chat-completion endpoint.
#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    model: &'a str,
    #[serde(flatten)]
    params: &'a DecodingParams,
}

/// A single message in the request.
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

impl ModelGateway for LiveModelGateway {
    fn call(&self, call: &ModelCall) -> GatewayFuture<'_> {
        let call = call.clone();

        Box::pin(async move {
            let request_id = format!("request-{}", self.id_gen.generate_id());
            let body = ChatRequest {
                messages: [
                    ChatMessage { role: "system", content: &call.system },
                    ChatMessage { role: "user", content: &call.user },
                ],
                model: &self.config.model,
                params: &self.config.params,
            };

            info!(stage = %call.label, %request_id, "calling model endpoint");

            let response = self
                .client
                .post(&self.config.api_url)
                .bearer_auth(&self.api_key)
                .header(REQUEST_ID_HEADER, &request_id)
                .json(&body)
                .send()
                .await
                .map_err(|e| transport_error(&call.label, &e, &self.config))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| transport_error(&call.label, &e, &self.config))?;

            if !status.is_success() {
                error!(stage = %call.label, %request_id, status = status.as_u16(), body = %text, "model endpoint returned an error");
                return Err(GatewayError::upstream(&call.label, status.as_u16(), text));
            }

            info!(stage = %call.label, %request_id, bytes = text.len(), "model endpoint answered");
            Ok(serde_json::from_str(&text).unwrap_or_else(|_| {
                debug!(stage = %call.label, "response body is not JSON, passing it on as text");
                Value::String(text)
            }))
        })
    }
}

fn transport_error(label: &str, err: &reqwest::Error, config: &ModelConfig) -> GatewayError {
    let message = if err.is_timeout() {
        format!("request timed out after {}s", config.timeout.as_secs())
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    };
    error!(stage = %label, %message, "model call failed");
    GatewayError::transport(label, message)
}
