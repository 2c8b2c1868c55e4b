//! CLI command definitions and handlers

mod check;
mod init;
mod rules;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// archgate - Layered-architecture gate for module monorepos
#[derive(Parser, Debug)]
#[command(name = "archgate")]
#[command(
    version,
    about = "Check a multi-module TypeScript/JavaScript monorepo against a layered architecture",
    long_about = "archgate builds the dependency graph between the modules declared in \
archgate.toml, checks every edge against a fixed catalog of layering rules, detects \
dependency cycles and scores compliance.\n\n\
Run without a subcommand to check the current directory:\n  \
archgate .",
    after_help = "\
Examples:
  archgate .                                  Check current directory
  archgate . check --format json              JSON output for scripting
  archgate . check --format html -o report.html   Standalone HTML report
  archgate . check --fail-on major            Exit 1 on major+ violations (CI mode)
  archgate . init                             Write an example archgate.toml
  archgate rules                              List the rule catalog"
)]
pub struct Cli {
    /// Path to the monorepo root (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the modules, validate dependencies and report compliance (default)
    #[command(after_help = "\
Exit codes:
  0  no violation at or above --fail-on
  1  gate failed, or a fatal error (missing config, unreadable root)")]
    Check(CheckArgs),

    /// Write an example archgate.toml to the repository root
    Init {
        /// Overwrite an existing archgate.toml
        #[arg(long)]
        force: bool,
    },

    /// List the architecture rules with their severities and weights
    Rules {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Options of the `check` command
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Output format: text, json, markdown (or md), html, dot [config: defaults.format]
    #[arg(long, short = 'f', value_parser = ["text", "json", "markdown", "md", "html", "dot"])]
    pub format: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Exit 1 when a violation at or above this severity exists
    /// (critical, major, minor, warning, none) [default: critical]
    #[arg(long, value_parser = ["critical", "major", "minor", "warning", "none"])]
    pub fail_on: Option<String>,

    /// Leave the dependency graph section out of the report
    #[arg(long)]
    pub no_graph: bool,
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Check(args)) => check::run(&cli.path, &args),
        Some(Commands::Init { force }) => init::run(&cli.path, force).map(|_| ExitCode::SUCCESS),
        Some(Commands::Rules { format }) => rules::run(&format).map(|_| ExitCode::SUCCESS),
        None => check::run(&cli.path, &CheckArgs::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_check() {
        let cli = Cli::try_parse_from(["archgate"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_check_flags() {
        let cli = Cli::try_parse_from([
            "archgate", "repo", "check", "--format", "json", "--fail-on", "major", "--no-graph",
        ])
        .unwrap();
        assert_eq!(cli.path, PathBuf::from("repo"));
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.format.as_deref(), Some("json"));
                assert_eq!(args.fail_on.as_deref(), Some("major"));
                assert!(args.no_graph);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["archgate", ".", "check", "--format", "sarif"]).is_err());
        assert!(Cli::try_parse_from(["archgate", ".", "check", "--fail-on", "high"]).is_err());
        assert!(Cli::try_parse_from(["archgate", "--log-level", "loud"]).is_err());
    }
}
