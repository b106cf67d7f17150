//! Clock port for timestamping analyses.

use chrono::{DateTime, Utc};

/// Provides the current time.
///
/// Used for the `analyzedAt` stamp and elapsed-time reporting; replay and
/// tests can substitute a fixed clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
