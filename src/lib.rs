//! Core library entry for the `archlens` CLI.
//!
//! An uploaded project archive is summarized into a bounded tree plus a few
//! configuration files, sent to a chat-completion model in two stages
//! (architecture definition, then file-to-layer mapping) and the merged
//! answer is returned as a stable JSON report.

pub mod adapters;
pub mod archive;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod decode;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod ports;
pub mod prompt;
pub mod report;
pub mod upload;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
