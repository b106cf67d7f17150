//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `archlens`.
#[derive(Debug, Parser)]
#[command(name = "archlens", version, about = "Layered architecture analysis of zipped projects")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze an archive with the model and print the report as JSON.
    Analyze(AnalyzeArgs),
    /// Summarize an archive locally without calling the model.
    Summarize {
        /// Path to the `.zip` archive.
        archive: PathBuf,
        /// Print the Stage 1 prompt instead of the summary.
        #[arg(long)]
        prompt: bool,
    },
}

/// Arguments of `archlens analyze`.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Path to the `.zip` archive.
    pub archive: PathBuf,
    /// Pretty-print the JSON body.
    #[arg(long)]
    pub pretty: bool,
    /// Serve model responses from a recorded cassette instead of the network.
    #[arg(long, value_name = "CASSETTE", conflicts_with = "record")]
    pub replay: Option<PathBuf>,
    /// Record the session to a cassette file.
    #[arg(long, value_name = "CASSETTE")]
    pub record: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_analyze_with_replay() {
        let cli = Cli::parse_from(["archlens", "analyze", "demo.zip", "--replay", "s.yaml", "--pretty"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.archive.to_str(), Some("demo.zip"));
        assert_eq!(args.replay.as_deref().and_then(|p| p.to_str()), Some("s.yaml"));
        assert!(args.pretty);
        assert!(args.record.is_none());
    }

    #[test]
    fn replay_and_record_conflict() {
        let result = Cli::try_parse_from([
            "archlens", "analyze", "demo.zip", "--replay", "a.yaml", "--record", "b.yaml",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_summarize_prompt_flag() {
        let cli = Cli::parse_from(["archlens", "summarize", "demo.zip", "--prompt"]);
        assert!(matches!(cli.command, Command::Summarize { prompt: true, .. }));
    }
}
