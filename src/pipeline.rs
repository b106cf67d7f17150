//! Two-stage analysis orchestration.
//!
//! Summarize, ask the model for the architecture, wait, ask it to map files
//! onto that architecture, merge. Strictly sequential; any failure ends the
//! run and no step is retried.

use std::fmt;
use std::io::{Read, Seek};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};

use crate::archive::{self, ParsedArchive};
use crate::context::ServiceContext;
use crate::decode::decode;
use crate::error::AnalysisError;
use crate::merge::{merge, Boundaries};
use crate::ports::ModelCall;
use crate::prompt::{stage1_prompt, stage2_prompt, Prompt};

/// One of the two model round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Boundaries, patterns and layer definitions.
    Architecture,
    /// File and folder assignment to the defined layers.
    FileMapping,
}

impl Stage {
    /// Human-readable label used in logs, errors and model calls.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Architecture => "Stage 1: Architecture Definition",
            Self::FileMapping => "Stage 2: File Mapping",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of a single analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing done yet.
    Start,
    /// Archive summary available.
    Summarized,
    /// Waiting for the Stage 1 reply.
    Stage1Called,
    /// Stage 1 JSON recovered.
    Stage1Decoded,
    /// Inter-stage pause finished.
    Delayed,
    /// Waiting for the Stage 2 reply.
    Stage2Called,
    /// Stage 2 JSON recovered.
    Stage2Decoded,
    /// Stage results merged.
    Merged,
    /// Analysis complete.
    Done,
    /// Terminal failure with its reason.
    Failed(String),
}

/// Result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Decoded Stage 1 reply.
    pub stage1: Value,
    /// Decoded Stage 2 reply.
    pub stage2: Value,
    /// Merged per-boundary layers.
    pub boundaries: Boundaries,
}

/// Runs analyses against the ports of a [`ServiceContext`].
pub struct Pipeline<'a> {
    ctx: &'a ServiceContext,
    stage_delay: Duration,
}

impl<'a> Pipeline<'a> {
    /// Creates a pipeline that pauses `stage_delay` between the two calls.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, stage_delay: Duration) -> Self {
        Self { ctx, stage_delay }
    }

    /// Summarizes the archive in `reader`, then analyzes it.
    ///
    /// # Errors
    ///
    /// Returns the summarizer's archive errors, or the errors of [`Self::analyze`].
    pub async fn analyze_archive<R: Read + Seek>(
        &self,
        reader: R,
    ) -> Result<(ParsedArchive, Analysis), AnalysisError> {
        let mut progress = Progress::new(PipelineState::Start);
        let archive = match archive::summarize(reader) {
            Ok(archive) => archive,
            Err(e) => {
                progress.fail(&e);
                return Err(e);
            }
        };
        progress.advance(PipelineState::Summarized);

        let analysis = self.analyze(&archive).await?;
        Ok((archive, analysis))
    }

    /// Runs both stages on an already summarized archive.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Model`] when a call fails and
    /// [`AnalysisError::Decode`] when a reply holds no JSON object. Stage 2
    /// is never attempted after a Stage 1 failure.
    pub async fn analyze(&self, archive: &ParsedArchive) -> Result<Analysis, AnalysisError> {
        let analysis_id = self.ctx.id_gen.generate_id();
        let span = info_span!("analysis", id = %analysis_id);

        async {
            let mut progress = Progress::new(PipelineState::Summarized);
            let result = self.run(archive, &mut progress).await;
            if let Err(e) = &result {
                progress.fail(e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        archive: &ParsedArchive,
        progress: &mut Progress,
    ) -> Result<Analysis, AnalysisError> {
        let stage1 = self.run_stage(Stage::Architecture, stage1_prompt(archive), progress).await?;

        info!(delay_secs = self.stage_delay.as_secs_f64(), "pausing before the next stage");
        self.ctx.sleeper.sleep(self.stage_delay).await;
        progress.advance(PipelineState::Delayed);

        let stage2 =
            self.run_stage(Stage::FileMapping, stage2_prompt(archive, &stage1), progress).await?;

        let boundaries = merge(&stage1, &stage2);
        progress.advance(PipelineState::Merged);

        progress.advance(PipelineState::Done);
        Ok(Analysis { stage1, stage2, boundaries })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        prompt: Prompt,
        progress: &mut Progress,
    ) -> Result<Value, AnalysisError> {
        let call = ModelCall {
            label: stage.label().to_string(),
            system: prompt.system.to_string(),
            user: prompt.user,
        };

        progress.advance(match stage {
            Stage::Architecture => PipelineState::Stage1Called,
            Stage::FileMapping => PipelineState::Stage2Called,
        });
        let envelope = self.ctx.gateway.call(&call).await?;

        let result = decode(&envelope).ok_or(AnalysisError::Decode { stage })?;
        progress.advance(match stage {
            Stage::Architecture => PipelineState::Stage1Decoded,
            Stage::FileMapping => PipelineState::Stage2Decoded,
        });
        Ok(result)
    }
}

/// Logs state transitions of one run.
struct Progress {
    state: PipelineState,
}

impl Progress {
    fn new(state: PipelineState) -> Self {
        Self { state }
    }

    fn advance(&mut self, next: PipelineState) {
        info!(from = ?self.state, to = ?next, "analysis state changed");
        self.state = next;
    }

    fn fail(&mut self, error: &AnalysisError) {
        warn!(from = ?self.state, error = %error, "analysis failed");
        self.state = PipelineState::Failed(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::ports::{GatewayError, GatewayFuture, ModelGateway, SleepFuture, Sleeper};

    /// Serves queued replies and remembers every call it saw.
    struct ScriptedGateway {
        replies: Mutex<VecDeque<Result<Value, GatewayError>>>,
        calls: Arc<Mutex<Vec<ModelCall>>>,
    }

    impl ModelGateway for ScriptedGateway {
        fn call(&self, call: &ModelCall) -> GatewayFuture<'_> {
            self.calls.lock().unwrap().push(call.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::transport(&call.label, "no scripted reply")));
            Box::pin(async move { reply })
        }
    }

    struct CountingSleeper(Arc<AtomicUsize>);

    impl Sleeper for CountingSleeper {
        fn sleep(&self, _duration: Duration) -> SleepFuture<'_> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::pin(std::future::ready(()))
        }
    }

    struct Harness {
        ctx: ServiceContext,
        calls: Arc<Mutex<Vec<ModelCall>>>,
        sleeps: Arc<AtomicUsize>,
    }

    fn harness(replies: Vec<Result<Value, GatewayError>>) -> Harness {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sleeps = Arc::new(AtomicUsize::new(0));
        let gateway = ScriptedGateway { replies: Mutex::new(replies.into()), calls: Arc::clone(&calls) };
        let ctx = ServiceContext::with_ports(
            Box::new(gateway),
            Box::new(CountingSleeper(Arc::clone(&sleeps))),
        );
        Harness { ctx, calls, sleeps }
    }

    fn reply(body: &Value) -> Result<Value, GatewayError> {
        Ok(json!({"result": {"message": {"content": format!("```json\n{body}\n```")}}}))
    }

    fn stage1_body() -> Value {
        json!({
            "boundaries": {"backend": {
                "architecturePatterns": ["MVC"],
                "layers": [{"name": "Controller"}, {"name": "Domain"}],
                "dependencyFlow": "Controller -> Domain"
            }},
            "crossBoundaryInteraction": "none"
        })
    }

    fn stage2_body() -> Value {
        json!({
            "boundaries": {"backend": {"layers": [{"name": "Controller", "files": ["app.js"], "folders": []}]}},
            "assumptions": ["guess"]
        })
    }

    #[tokio::test]
    async fn runs_both_stages_and_merges() {
        let h = harness(vec![reply(&stage1_body()), reply(&stage2_body())]);
        let analysis =
            Pipeline::new(&h.ctx, Duration::from_secs(15)).analyze(&ParsedArchive::default()).await.unwrap();

        assert_eq!(analysis.stage1, stage1_body());
        assert_eq!(analysis.stage2, stage2_body());
        assert_eq!(analysis.boundaries["backend"].layers[0].files, vec![json!("app.js")]);
        assert!(analysis.boundaries["backend"].layers[1].files.is_empty());
        assert_eq!(h.sleeps.load(Ordering::SeqCst), 1);

        let calls = h.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].label, "Stage 1: Architecture Definition");
        assert_eq!(calls[1].label, "Stage 2: File Mapping");
        assert!(calls[1].user.contains("\"dependencyFlow\": \"Controller -> Domain\""));
    }

    #[tokio::test]
    async fn stage1_failure_skips_delay_and_stage2() {
        let h = harness(vec![Err(GatewayError::transport(
            Stage::Architecture.label(),
            "request timed out after 90s",
        ))]);
        let err = Pipeline::new(&h.ctx, Duration::from_secs(15))
            .analyze(&ParsedArchive::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Model(_)));
        assert_eq!(h.calls.lock().unwrap().len(), 1);
        assert_eq!(h.sleeps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn undecodable_stage1_reply_is_a_decode_error() {
        let h = harness(vec![Ok(json!({"result": {"message": {"content": "sorry, no"}}}))]);
        let err = Pipeline::new(&h.ctx, Duration::ZERO).analyze(&ParsedArchive::default()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Decode { stage: Stage::Architecture }));
        assert_eq!(h.sleeps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn undecodable_stage2_reply_names_stage2() {
        let h = harness(vec![reply(&stage1_body()), Ok(json!("plain words"))]);
        let err = Pipeline::new(&h.ctx, Duration::ZERO).analyze(&ParsedArchive::default()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Decode { stage: Stage::FileMapping }));
        assert_eq!(h.sleeps.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_archive_never_reaches_the_model() {
        let h = harness(vec![]);
        let err = Pipeline::new(&h.ctx, Duration::ZERO)
            .analyze_archive(std::io::Cursor::new(b"nope".to_vec()))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidArchive(_)));
        assert!(h.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn stage_labels() {
        assert_eq!(Stage::Architecture.to_string(), "Stage 1: Architecture Definition");
        assert_eq!(Stage::FileMapping.label(), "Stage 2: File Mapping");
    }
}
