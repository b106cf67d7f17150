//! Sleeper port for the fixed pause between model calls.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future type alias used by [`Sleeper`] to keep the trait dyn-compatible.
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Suspends the current analysis for a while.
///
/// The live adapter really waits; replaying adapters return immediately so
/// recorded sessions run at full speed.
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`. Not cancellable.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}
