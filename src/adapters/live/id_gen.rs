//! Random identifiers behind the `IdGenerator` port.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Mints UUID v4 strings.
///
/// One id tags each analysis span, one keeps staged uploads apart, and the
/// live gateway prefixes one with `request-` for every model call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveIdGenerator;

impl LiveIdGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_fresh_hyphenated_uuids() {
        let ids = LiveIdGenerator::new();
        let first = ids.generate_id();

        assert_ne!(first, ids.generate_id());
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(first.matches('-').count(), 4);
    }
}
