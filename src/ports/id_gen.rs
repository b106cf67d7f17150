//! ID generator port for correlation identifiers.

/// Generates unique identifiers.
///
/// Every model call and every analysis carries one so that log lines and
/// upstream request logs can be joined.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
