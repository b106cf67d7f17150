//! Staging of an uploaded archive as an owned temporary copy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::UploadConfig;
use crate::error::AnalysisError;

/// A staged archive that is deleted when dropped.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    original_name: String,
    size: u64,
}

impl StagedUpload {
    /// Validates `source` and copies it into the upload directory as
    /// `<millis>-<id>-<original name>`.
    ///
    /// `id` keeps concurrent uploads of the same name apart. A copy that fails
    /// halfway is removed like any other staged file.
    ///
    /// # Errors
    ///
    /// Returns, in this order of checks: [`AnalysisError::NoFileProvided`]
    /// when there is no source or it does not exist,
    /// [`AnalysisError::UnsupportedFile`] when it is not a `.zip`,
    /// [`AnalysisError::FileTooLarge`] when it exceeds the limit, and
    /// [`AnalysisError::Io`] when the copy fails.
    pub fn stage(
        source: Option<&Path>,
        config: &UploadConfig,
        now: DateTime<Utc>,
        id: &str,
    ) -> Result<Self, AnalysisError> {
        let source = source.ok_or(AnalysisError::NoFileProvided)?;
        let metadata = match fs::metadata(source) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(AnalysisError::NoFileProvided),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AnalysisError::NoFileProvided)
            }
            Err(e) => return Err(e.into()),
        };

        let original_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_zip_name(&original_name) {
            return Err(AnalysisError::UnsupportedFile { name: original_name });
        }

        let size = metadata.len();
        if size > config.max_bytes {
            return Err(AnalysisError::FileTooLarge { size, limit: config.max_bytes });
        }

        fs::create_dir_all(&config.dir)?;
        let path = config.dir.join(format!("{}-{id}-{original_name}", now.timestamp_millis()));

        // Guard first: fs::copy creates the destination before streaming.
        let staged = Self { path, original_name, size };
        fs::copy(source, &staged.path)?;

        info!(upload = %staged.original_name, bytes = size, staged = %staged.path.display(), "upload staged");
        Ok(staged)
    }

    /// Location of the staged copy.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as uploaded.
    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(staged = %self.path.display(), "staged upload removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(staged = %self.path.display(), error = %e, "failed to remove staged upload"),
        }
    }
}

fn is_zip_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}
