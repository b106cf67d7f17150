//! `archlens analyze`: stage the upload, run both model stages, print the report.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use tracing::error;

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::AnalysisError;
use crate::pipeline::Pipeline;
use crate::report::{ErrorBody, SuccessBody};
use crate::upload::StagedUpload;

/// Run an analysis and print the success or error body to stdout.
///
/// The context is built before the upload is looked at, so a missing API key
/// is reported as a configuration error even for an unusable archive.
///
/// # Errors
///
/// Returns an error string when the context cannot be built or the analysis
/// fails; the error body has already been printed in the latter case.
pub fn run(args: &AnalyzeArgs, config: &Config) -> Result<(), String> {
    let ctx = match (&args.replay, &args.record) {
        (Some(cassette), _) => ServiceContext::replaying(cassette)?,
        (None, Some(cassette)) => {
            ServiceContext::recording(&config.model, cassette).map_err(|e| e.to_string())?
        }
        (None, None) => ServiceContext::live(&config.model).map_err(|e| e.to_string())?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    match runtime.block_on(execute(&ctx, config, Some(args.archive.as_path()))) {
        Ok(body) => print_json(&body, args.pretty),
        Err(err) => {
            error!(error = %err, "analysis failed");
            let body = ErrorBody::from_error(&err);
            print_json(&body, args.pretty)?;
            Err(format!("{} (status {}): {err}", body.error.code, body.status))
        }
    }
}

/// Stage `source`, analyze it and assemble the success body.
///
/// The staged copy is removed before this returns, whatever the outcome.
///
/// # Errors
///
/// Returns the first [`AnalysisError`] raised by staging, summarization or
/// either model stage.
pub async fn execute(
    ctx: &ServiceContext,
    config: &Config,
    source: Option<&Path>,
) -> Result<SuccessBody, AnalysisError> {
    let started_at = ctx.clock.now();
    let upload_id = ctx.id_gen.generate_id();
    let staged = StagedUpload::stage(source, &config.upload, started_at, &upload_id)?;
    let reader = BufReader::new(File::open(staged.path())?);

    let (archive, analysis) =
        Pipeline::new(ctx, config.stage_delay).analyze_archive(reader).await?;

    Ok(SuccessBody::new(archive, analysis, started_at, ctx.clock.now()))
}

fn print_json<T: Serialize>(body: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty { serde_json::to_string_pretty(body) } else { serde_json::to_string(body) };
    println!("{}", json.map_err(|e| format!("Failed to serialize report: {e}"))?);
    Ok(())
}
