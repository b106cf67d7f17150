//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::gateway::LiveModelGateway;
use crate::adapters::live::id_gen::LiveIdGenerator;
use crate::adapters::live::sleeper::LiveSleeper;
use crate::adapters::recording::{
    RecordingClock, RecordingIdGenerator, RecordingModelGateway, RecordingSleeper,
};
use crate::adapters::replaying::{
    ReplayingClock, ReplayingIdGenerator, ReplayingModelGateway, ReplayingSleeper,
};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::{ConfigError, ModelConfig};
use crate::ports::{Clock, IdGenerator, ModelGateway, Sleeper};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, recording, replaying).
pub struct ServiceContext {
    /// Chat-completion endpoint.
    pub gateway: Box<dyn ModelGateway>,
    /// Inter-stage pause.
    pub sleeper: Box<dyn Sleeper>,
    /// Analysis identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Timestamps for the report.
    pub clock: Box<dyn Clock>,
    /// Shared cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a live context that talks to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the gateway cannot be built (for example
    /// when no API key is configured).
    pub fn live(config: &ModelConfig) -> Result<Self, ConfigError> {
        let gateway = LiveModelGateway::new(config.clone(), Box::new(LiveIdGenerator::new()))?;
        Ok(Self {
            gateway: Box::new(gateway),
            sleeper: Box::new(LiveSleeper),
            id_gen: Box::new(LiveIdGenerator::new()),
            clock: Box::new(LiveClock),
            recorder: None,
        })
    }

    /// Creates a live context that also records every interaction to `path`.
    ///
    /// The cassette is written when the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the live gateway cannot be built.
    pub fn recording(config: &ModelConfig, path: &Path) -> Result<Self, ConfigError> {
        let live = LiveModelGateway::new(config.clone(), Box::new(LiveIdGenerator::new()))?;
        let recorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "archlens-session", &config.model)));

        info!(cassette = %path.display(), "recording session");
        Ok(Self {
            gateway: Box::new(RecordingModelGateway::new(Box::new(live), Arc::clone(&recorder))),
            sleeper: Box::new(RecordingSleeper::new(Box::new(LiveSleeper), Arc::clone(&recorder))),
            id_gen: Box::new(RecordingIdGenerator::new(
                Box::new(LiveIdGenerator::new()),
                Arc::clone(&recorder),
            )),
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            recorder: Some(recorder),
        })
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// All ports share one replayer; each port/method pair keeps its own
    /// cursor, so the interleaving of ports does not matter.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        info!(
            cassette = %path.display(),
            interactions = cassette.interactions.len(),
            "replaying session"
        );
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));

        Ok(Self {
            gateway: Box::new(ReplayingModelGateway::new(Arc::clone(&replayer))),
            sleeper: Box::new(ReplayingSleeper::new(Arc::clone(&replayer))),
            id_gen: Box::new(ReplayingIdGenerator::new(Arc::clone(&replayer))),
            clock: Box::new(ReplayingClock::new(replayer)),
            recorder: None,
        })
    }

    /// Creates a context around caller-supplied gateway and sleeper.
    ///
    /// IDs and time come from the live adapters.
    #[must_use]
    pub fn with_ports(gateway: Box<dyn ModelGateway>, sleeper: Box<dyn Sleeper>) -> Self {
        Self {
            gateway,
            sleeper,
            id_gen: Box::new(LiveIdGenerator::new()),
            clock: Box::new(LiveClock),
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            match recorder.save() {
                Ok(path) => info!(cassette = %path.display(), "cassette written"),
                Err(e) => warn!(cassette = %recorder.path().display(), error = %e, "failed to write cassette"),
            }
        }
    }
}
