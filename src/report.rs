//! Success and error bodies handed back to clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::archive::{filters, ExtractedContents, FileTreeNode, ParsedArchive};
use crate::error::AnalysisError;
use crate::merge::{or_default, Boundaries};
use crate::pipeline::Analysis;

const UNKNOWN_PROJECT: &str = "Unknown Project";

/// Dependency names and the framework each one reveals, in report order.
const FRAMEWORK_DEPENDENCIES: &[(&str, &str)] = &[
    ("next", "Next.js"),
    ("react", "React"),
    ("vue", "Vue"),
    ("@angular/core", "Angular"),
    ("express", "Express"),
    ("nestjs", "NestJS"),
    ("@nestjs/core", "NestJS"),
    ("fastify", "Fastify"),
    ("tailwindcss", "Tailwind CSS"),
    ("typescript", "TypeScript"),
];

/// Headline facts about the uploaded project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// `name` from the first usable `package.json`.
    pub name: String,
    /// Frameworks inferred from manifests, without duplicates.
    pub detected_framework: Vec<String>,
    /// Files kept by the summarizer.
    pub file_count: usize,
    /// Folders kept by the summarizer.
    pub folder_count: usize,
}

impl ProjectInfo {
    /// Derives project facts from a summarized archive.
    ///
    /// When the archive had no explicit directory entries the folder count is
    /// taken from the reconstructed tree instead.
    #[must_use]
    pub fn from_archive(archive: &ParsedArchive) -> Self {
        let folder_count = if archive.folder_count > 0 {
            archive.folder_count
        } else {
            count_folders(&archive.tree)
        };

        Self {
            name: project_name(&archive.contents),
            detected_framework: detect_frameworks(&archive.contents),
            file_count: archive.file_count,
            folder_count,
        }
    }
}

/// Returns the first `name` found in an extracted `package.json`.
#[must_use]
pub fn project_name(contents: &ExtractedContents) -> String {
    manifests(contents)
        .find_map(|manifest| {
            manifest.get("name").and_then(Value::as_str).filter(|name| !name.is_empty()).map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

/// Lists frameworks declared in any extracted `package.json`, plus Turborepo
/// when a root `turbo.json` was extracted.
#[must_use]
pub fn detect_frameworks(contents: &ExtractedContents) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut add = |name: &str| {
        if !found.iter().any(|f| f == name) {
            found.push(name.to_string());
        }
    };

    for manifest in manifests(contents) {
        let declared = |dep: &str| {
            ["dependencies", "devDependencies"]
                .iter()
                .any(|section| manifest.get(section).and_then(|d| d.get(dep)).is_some_and(is_truthy))
        };
        for &(dep, framework) in FRAMEWORK_DEPENDENCIES {
            if declared(dep) {
                add(framework);
            }
        }
    }

    if contents.contains_key("turbo.json") {
        add("Turborepo");
    }
    found
}

/// Parsed `package.json` files, skipping those that are not valid JSON.
fn manifests(contents: &ExtractedContents) -> impl Iterator<Item = Value> + '_ {
    contents
        .iter()
        .filter(|(path, _)| filters::basename(path).eq_ignore_ascii_case("package.json"))
        .filter_map(|(_, text)| serde_json::from_str(text).ok())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

fn count_folders(nodes: &[FileTreeNode]) -> usize {
    nodes
        .iter()
        .filter(|node| node.is_folder())
        .map(|node| 1 + node.children.as_deref().map_or(0, count_folders))
        .sum()
}

/// Diagnostic block attached to every success body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Decoded Stage 1 reply.
    pub stage1: Value,
    /// Decoded Stage 2 reply.
    pub stage2: Value,
    /// When the analysis finished.
    pub analyzed_at: DateTime<Utc>,
    /// Wall-clock duration of the analysis.
    pub elapsed_ms: i64,
}

/// Payload of a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Project headline facts.
    pub project_info: ProjectInfo,
    /// Merged boundaries.
    pub boundaries: Boundaries,
    /// Stage 1 description of boundary interaction.
    pub cross_boundary_interaction: Value,
    /// Stage 2 assumptions.
    pub assumptions: Value,
    /// Reconstructed project tree.
    pub file_tree: Vec<FileTreeNode>,
    /// Raw stage replies and timing.
    #[serde(rename = "_debug")]
    pub debug: DebugInfo,
}

/// `{ success: true, data }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessBody {
    /// Always `true`.
    pub success: bool,
    /// The report.
    pub data: ReportData,
}

impl SuccessBody {
    /// Assembles the success body from the archive summary and the analysis.
    #[must_use]
    pub fn new(
        archive: ParsedArchive,
        analysis: Analysis,
        started_at: DateTime<Utc>,
        analyzed_at: DateTime<Utc>,
    ) -> Self {
        let project_info = ProjectInfo::from_archive(&archive);
        let Analysis { stage1, stage2, boundaries } = analysis;

        Self {
            success: true,
            data: ReportData {
                project_info,
                boundaries,
                cross_boundary_interaction: or_default(
                    &stage1,
                    "crossBoundaryInteraction",
                    Value::String(String::new()),
                ),
                assumptions: or_default(&stage2, "assumptions", Value::Array(Vec::new())),
                file_tree: archive.tree,
                debug: DebugInfo {
                    stage1,
                    stage2,
                    analyzed_at,
                    elapsed_ms: (analyzed_at - started_at).num_milliseconds().max(0),
                },
            },
        }
    }
}

/// `{ code, message }` inside an error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    /// Stable error code.
    pub code: &'static str,
    /// Human-readable explanation.
    pub message: String,
}

/// `{ success: false, error }`, plus the HTTP-equivalent status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Code and message.
    pub error: ErrorDetail,
    /// Status an HTTP front end would answer with.
    #[serde(skip)]
    pub status: u16,
}

impl ErrorBody {
    /// Builds the client-facing body for `err`.
    ///
    /// Messages are fixed per code; raw error text is only logged.
    #[must_use]
    pub fn from_error(err: &AnalysisError) -> Self {
        let code = err.code();
        let message = match err {
            AnalysisError::NoFileProvided => "No file was uploaded.".to_string(),
            AnalysisError::FileTooLarge { limit, .. } => {
                format!("The file must be {} MB or smaller.", limit / (1024 * 1024))
            }
            AnalysisError::UnsupportedFile { .. } | AnalysisError::InvalidArchive(_) => {
                "The file is not a valid ZIP archive.".to_string()
            }
            AnalysisError::ArchiveRead { .. } => {
                "An error occurred while parsing the ZIP archive.".to_string()
            }
            AnalysisError::Model(e) => match e.status {
                Some(status) => {
                    format!("An error occurred during AI analysis (upstream status {status}).")
                }
                None => "An error occurred during AI analysis.".to_string(),
            },
            AnalysisError::Decode { stage } => {
                format!("The AI response for {stage} could not be interpreted.")
            }
            AnalysisError::Io(_) => "An unknown error occurred.".to_string(),
        };

        Self {
            success: false,
            error: ErrorDetail { code: code.as_str(), message },
            status: code.status(),
        }
    }
}
