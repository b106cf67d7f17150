//! `archlens summarize`: local summary without any model call.

use std::path::Path;

use crate::archive::summarize_path;
use crate::prompt::stage1_prompt;

/// Print the archive summary as JSON, or the Stage 1 prompt when `prompt` is set.
///
/// # Errors
///
/// Returns an error string if the archive cannot be read.
pub fn run(archive: &Path, prompt: bool) -> Result<(), String> {
    let parsed = summarize_path(archive).map_err(|e| format!("{}: {e}", archive.display()))?;

    if prompt {
        let prompt = stage1_prompt(&parsed);
        println!("{}\n\n{}", prompt.system, prompt.user);
    } else {
        let json = serde_json::to_string_pretty(&parsed)
            .map_err(|e| format!("Failed to serialize summary: {e}"))?;
        println!("{json}");
    }
    Ok(())
}
