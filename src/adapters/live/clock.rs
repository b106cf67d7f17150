//! System clock behind the `Clock` port.

use chrono::{DateTime, Utc};

use crate::ports::clock::Clock;

/// Reads the system clock.
///
/// Stamps the staged upload name, the report's `analyzedAt` and the start of
/// the `elapsedMs` measurement.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
