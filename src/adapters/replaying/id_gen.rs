//! Replaying adapter for the `IdGenerator` port.

use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::IdGenerator;

/// Replays recorded IDs from a cassette, minting a fresh one when none is left.
pub struct ReplayingIdGenerator {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    fn generate_id(&self) -> String {
        match next_output(&self.replayer, "id_gen", "generate_id") {
            Ok(serde_json::Value::String(id)) => id,
            Ok(other) => {
                warn!(output = %other, "recorded id is not a string, minting a new one");
                Uuid::new_v4().to_string()
            }
            Err(message) => {
                warn!(%message, "minting a new id");
                Uuid::new_v4().to_string()
            }
        }
    }
}
