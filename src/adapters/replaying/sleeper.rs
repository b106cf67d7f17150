//! Replaying adapter for the `Sleeper` port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{SleepFuture, Sleeper};

/// Consumes recorded pauses without waiting.
pub struct ReplayingSleeper {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingSleeper {
    /// Create a replaying sleeper backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl Sleeper for ReplayingSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        if let Err(message) = next_output(&self.replayer, "sleeper", "sleep") {
            debug!(?duration, %message, "no recorded pause, continuing");
        }
        Box::pin(std::future::ready(()))
    }
}
