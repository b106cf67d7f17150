//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the analysis core and something
//! it does not control (the model endpoint, wall-clock time, waiting, IDs).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod gateway;
pub mod id_gen;
pub mod sleeper;

pub use clock::Clock;
pub use gateway::{GatewayError, GatewayFuture, ModelCall, ModelGateway};
pub use id_gen::IdGenerator;
pub use sleeper::{SleepFuture, Sleeper};
