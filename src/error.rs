//! Error taxonomy shared by every step of an analysis.

use zip::result::ZipError;

use crate::pipeline::Stage;
use crate::ports::gateway::GatewayError;

/// Every way an analysis can fail.
///
/// Variants keep their original classification all the way to the caller so
/// that archive problems stay distinguishable from model problems.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No archive was supplied.
    #[error("no archive was provided")]
    NoFileProvided,

    /// The archive exceeds the configured upload limit.
    #[error("archive is {size} bytes, the limit is {limit} bytes")]
    FileTooLarge {
        /// Actual archive size.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The upload does not carry a `.zip` extension.
    #[error("only .zip archives are accepted, got {name:?}")]
    UnsupportedFile {
        /// File name as supplied.
        name: String,
    },

    /// The container could not be opened (bad magic, corrupt central directory).
    #[error("invalid ZIP archive: {0}")]
    InvalidArchive(#[source] ZipError),

    /// An I/O fault occurred while walking the archive entries.
    #[error("failed to read archive entry #{index}: {source}")]
    ArchiveRead {
        /// Position of the entry in the central directory.
        index: usize,
        /// Underlying archive error.
        #[source]
        source: ZipError,
    },

    /// The model endpoint call failed.
    #[error(transparent)]
    Model(#[from] GatewayError),

    /// The model replied but no JSON object could be recovered.
    #[error("{stage} response did not contain a parseable JSON object")]
    Decode {
        /// Which stage produced the unusable reply.
        stage: Stage,
    },

    /// Local file handling around the upload failed.
    #[error("upload handling failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Stable machine-readable classification of this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoFileProvided => ErrorCode::NoFile,
            Self::FileTooLarge { .. } => ErrorCode::FileTooLarge,
            Self::UnsupportedFile { .. } | Self::InvalidArchive(_) => ErrorCode::InvalidZip,
            Self::ArchiveRead { .. } => ErrorCode::ParseError,
            Self::Model(_) => ErrorCode::AiError,
            Self::Decode { .. } => ErrorCode::AiParseError,
            Self::Io(_) => ErrorCode::Unknown,
        }
    }
}

/// Error codes reported to clients, with their HTTP-equivalent status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// No archive in the request.
    NoFile,
    /// Archive above the upload limit.
    FileTooLarge,
    /// Not a ZIP archive.
    InvalidZip,
    /// ZIP archive that could not be walked.
    ParseError,
    /// Model endpoint failure.
    AiError,
    /// Model reply without a usable JSON object.
    AiParseError,
    /// Anything else.
    Unknown,
}

impl ErrorCode {
    /// Wire representation, e.g. `INVALID_ZIP`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoFile => "NO_FILE",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::InvalidZip => "INVALID_ZIP",
            Self::ParseError => "PARSE_ERROR",
            Self::AiError => "AI_ERROR",
            Self::AiParseError => "AI_PARSE_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// HTTP status an HTTP front end should answer with.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::NoFile | Self::InvalidZip => 400,
            Self::FileTooLarge => 413,
            Self::ParseError => 422,
            Self::AiError | Self::AiParseError => 502,
            Self::Unknown => 500,
        }
    }
}
