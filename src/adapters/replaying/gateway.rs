//! Replaying adapter for the `ModelGateway` port.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{GatewayError, GatewayFuture, ModelCall, ModelGateway};

/// Serves recorded model responses (and recorded failures) from a cassette.
pub struct ReplayingModelGateway {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingModelGateway {
    /// Create a replaying gateway backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ModelGateway for ReplayingModelGateway {
    fn call(&self, call: &ModelCall) -> GatewayFuture<'_> {
        let label = call.label.clone();
        let result = next_output(&self.replayer, "gateway", "call")
            .map_err(|message| GatewayError::transport(&label, message))
            .and_then(|output| {
                serde_json::from_value::<Result<Value, GatewayError>>(output).map_err(|e| {
                    GatewayError::transport(&label, format!("malformed cassette entry: {e}"))
                })?
            });
        Box::pin(async move { result })
    }
}
