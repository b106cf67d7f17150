//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod gateway;
pub mod id_gen;
pub mod sleeper;

pub use clock::ReplayingClock;
pub use gateway::ReplayingModelGateway;
pub use id_gen::ReplayingIdGenerator;
pub use sleeper::ReplayingSleeper;

use std::sync::{Arc, Mutex, PoisonError};

use crate::cassette::replayer::CassetteReplayer;

/// Pull the next recorded output for `port::method` from a shared replayer.
///
/// # Errors
///
/// Returns the replayer's message when the cassette has nothing left to serve.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).map(|interaction| interaction.output.clone())
}
