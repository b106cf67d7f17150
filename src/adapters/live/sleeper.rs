//! Live sleeper backed by the tokio timer.

use std::time::Duration;

use crate::ports::sleeper::{SleepFuture, Sleeper};

/// Waits for real.
pub struct LiveSleeper;

impl Sleeper for LiveSleeper {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sleeps_for_the_requested_duration() {
        let start = tokio::time::Instant::now();
        LiveSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
