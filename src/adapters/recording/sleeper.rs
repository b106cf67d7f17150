//! Recording adapter for the `Sleeper` port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{SleepFuture, Sleeper};

/// Records pauses while delegating to an inner sleeper.
pub struct RecordingSleeper {
    inner: Box<dyn Sleeper>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSleeper {
    /// Creates a new recording sleeper wrapping the given implementation.
    pub fn new(inner: Box<dyn Sleeper>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(async move {
            self.inner.sleep(duration).await;
            let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            record_interaction(&self.recorder, "sleeper", "sleep", &json!({ "millis": millis }), &());
        })
    }
}
