//! Command dispatch and handlers.

pub mod analyze;
pub mod summarize;

use crate::cli::Command;
use crate::config::Config;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Analyze(args) => {
            let config = Config::from_env().map_err(|e| e.to_string())?;
            analyze::run(args, &config)
        }
        Command::Summarize { archive, prompt } => summarize::run(archive, *prompt),
    }
}
