//! Recording adapter for the `IdGenerator` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::IdGenerator;

/// Records generated IDs while delegating to an inner implementation.
pub struct RecordingIdGenerator {
    inner: Box<dyn IdGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingIdGenerator {
    /// Creates a new recording ID generator wrapping the given implementation.
    pub fn new(inner: Box<dyn IdGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl IdGenerator for RecordingIdGenerator {
    fn generate_id(&self) -> String {
        let result = self.inner.generate_id();
        record_interaction(&self.recorder, "id_gen", "generate_id", &(), &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::id_gen::LiveIdGenerator;
    use crate::cassette::format::Cassette;

    #[test]
    fn records_generate_id_interaction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id_gen.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "test", "m")));

        let gen = RecordingIdGenerator::new(Box::new(LiveIdGenerator::new()), Arc::clone(&recorder));
        let id = gen.generate_id();

        recorder.lock().unwrap().save().unwrap();
        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.interactions[0].method, "generate_id");
        assert_eq!(cassette.interactions[0].output, serde_json::json!(id));
    }
}
