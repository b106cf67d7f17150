//! Recording adapters that capture interactions to cassettes.

pub mod clock;
pub mod gateway;
pub mod id_gen;
pub mod sleeper;

pub use clock::RecordingClock;
pub use gateway::RecordingModelGateway;
pub use id_gen::RecordingIdGenerator;
pub use sleeper::RecordingSleeper;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Record one interaction.
///
/// Mirror of `replaying::next_output`: records input/output instead of
/// reading them. `Result` outputs serialize as `{"Ok": v}` / `{"Err": e}`,
/// which is exactly what the replaying side deserializes.
pub(crate) fn record_interaction<I, O>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let (input_json, output_json) =
        match (serde_json::to_value(input), serde_json::to_value(output)) {
            (Ok(input), Ok(output)) => (input, output),
            (Err(e), _) | (_, Err(e)) => {
                warn!(port, method, error = %e, "interaction not recorded");
                return;
            }
        };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input_json, output_json);
}
