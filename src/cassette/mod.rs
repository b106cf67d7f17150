//! Cassettes: recorded model sessions that can be replayed offline.

pub mod format;
pub mod recorder;
pub mod replayer;
