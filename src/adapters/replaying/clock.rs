//! Replaying adapter for the `Clock` port.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::warn;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::Clock;

/// Replays recorded clock readings from a cassette.
///
/// Falls back to the system clock when the cassette has no usable reading,
/// which only affects timestamps in the report.
pub struct ReplayingClock {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingClock {
    /// Creates a new replaying clock backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl Clock for ReplayingClock {
    fn now(&self) -> DateTime<Utc> {
        let recorded = next_output(&self.replayer, "clock", "now").and_then(|output| {
            serde_json::from_value(output).map_err(|e| format!("malformed clock entry: {e}"))
        });
        recorded.unwrap_or_else(|message| {
            warn!(%message, "using system time");
            Utc::now()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::cassette::format::{Cassette, Interaction};

    fn make_clock(outputs: Vec<Value>) -> ReplayingClock {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "clock".into(),
                method: "now".into(),
                input: Value::Null,
                output,
            })
            .collect();
        let cassette =
            Cassette { name: "t".into(), recorded_at: Utc::now(), model: "m".into(), interactions };
        ReplayingClock::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    #[test]
    fn serves_recorded_times_in_order() {
        let clock = make_clock(vec![json!("2024-01-01T00:00:00Z"), json!("2024-01-01T00:01:00Z")]);
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(clock.now().to_rfc3339(), "2024-01-01T00:01:00+00:00");
    }

    #[test]
    fn exhausted_cassette_falls_back_to_system_time() {
        let clock = make_clock(vec![]);
        let before = Utc::now();
        assert!(clock.now() >= before);
    }
}
