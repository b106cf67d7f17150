//! Single-pass ZIP walk producing a [`ParsedArchive`].

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, info, warn};
use zip::ZipArchive;

use super::filters::{is_allowed_file, is_excluded, normalize_path};
use super::tree::insert_path;
use super::{NodeKind, ParsedArchive};
use crate::error::AnalysisError;

/// Maximum number of characters kept per extracted file.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Appended to content cut at [`MAX_CONTENT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Enough bytes to hold one character past the limit at 4 bytes per char.
const READ_CAP_BYTES: u64 = (MAX_CONTENT_CHARS as u64 + 1) * 4;

/// Summarizes a ZIP archive read from `reader`.
///
/// Entries are visited in central-directory order and each entry's content is
/// fully consumed before the next one is opened. Unreadable or binary content
/// of allow-listed files is skipped with a warning.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidArchive`] if the container cannot be
/// opened, or [`AnalysisError::ArchiveRead`] if an entry header cannot be read.
pub fn summarize<R: Read + Seek>(reader: R) -> Result<ParsedArchive, AnalysisError> {
    let mut archive = ZipArchive::new(reader).map_err(AnalysisError::InvalidArchive)?;
    let mut parsed = ParsedArchive::default();
    let mut excluded = 0usize;

    debug!(entries = archive.len(), "walking archive");

    for index in 0..archive.len() {
        let (raw_name, is_dir) = {
            let entry = archive
                .by_index_raw(index)
                .map_err(|source| AnalysisError::ArchiveRead { index, source })?;
            let name = entry.name().to_string();
            let is_dir = entry.is_dir() || name.ends_with('\\');
            (name, is_dir)
        };

        let path = normalize_path(&raw_name);
        if path.is_empty() {
            continue;
        }
        if is_excluded(&path, is_dir) {
            excluded += 1;
            continue;
        }

        if is_dir {
            insert_path(&mut parsed.tree, &path, NodeKind::Folder);
            parsed.folder_count += 1;
            continue;
        }

        insert_path(&mut parsed.tree, &path, NodeKind::File);
        parsed.file_count += 1;

        if !is_allowed_file(&path) {
            continue;
        }

        let bytes = match archive.by_index(index) {
            Ok(entry) => {
                let mut buf = Vec::new();
                match entry.take(READ_CAP_BYTES).read_to_end(&mut buf) {
                    Ok(_) => buf,
                    Err(e) => {
                        warn!(%path, error = %e, "could not read entry content, skipping");
                        continue;
                    }
                }
            }
            Err(e) => {
                warn!(%path, error = %e, "could not open entry, skipping content");
                continue;
            }
        };

        match read_text(&bytes) {
            Some(text) => {
                parsed.contents.insert(path, text);
            }
            None => warn!(%path, "entry looks binary, skipping content"),
        }
    }

    info!(
        files = parsed.file_count,
        folders = parsed.folder_count,
        extracted = parsed.contents.len(),
        excluded,
        "archive summarized"
    );
    Ok(parsed)
}

/// Opens the archive at `path` and summarizes it.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be opened, otherwise the
/// errors of [`summarize`].
pub fn summarize_path(path: &Path) -> Result<ParsedArchive, AnalysisError> {
    let file = File::open(path)?;
    summarize(BufReader::new(file))
}

/// Decodes a bounded prefix of an entry as text and applies the character limit.
///
/// Returns `None` for content with NUL bytes or invalid UTF-8. A multi-byte
/// sequence split by the read cap is dropped rather than treated as invalid.
fn read_text(bytes: &[u8]) -> Option<String> {
    if bytes.contains(&0) {
        return None;
    }

    let capped = bytes.len() as u64 >= READ_CAP_BYTES;
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) if capped && e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };

    match text.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((cut, _)) => Some(format!("{}{TRUNCATION_MARKER}", &text[..cut])),
        None => Some(text.to_string()),
    }
}
