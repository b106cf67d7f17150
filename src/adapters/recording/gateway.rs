//! Recording adapter for the `ModelGateway` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{GatewayFuture, ModelCall, ModelGateway};

/// Records model calls, successful or not, while delegating to an inner gateway.
pub struct RecordingModelGateway {
    inner: Box<dyn ModelGateway>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingModelGateway {
    /// Creates a new recording gateway wrapping the given implementation.
    pub fn new(inner: Box<dyn ModelGateway>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ModelGateway for RecordingModelGateway {
    fn call(&self, call: &ModelCall) -> GatewayFuture<'_> {
        let call = call.clone();

        Box::pin(async move {
            let result = self.inner.call(&call).await;
            record_interaction(&self.recorder, "gateway", "call", &call, &result);
            result
        })
    }
}
