//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// energy-sync - align RAW power traces with ANDROID operation logs
#[derive(Parser, Debug)]
#[command(
    name = "energy-sync",
    author,
    version,
    about = "Per-operation energy from a RAW power trace and an ANDROID log",
    long_about = "Synchronizes the power monitor clock with the device clock using the \n\
                  sync pulse train recorded on the monitor's input pin, then reports the \n\
                  mean power and energy of every logged operation."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ENERGY_SYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "ENERGY_SYNC_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Expose Prometheus metrics on this port while running
    #[arg(long, global = true, env = "ENERGY_SYNC_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one measurement run of a scenario
    Analyze(AnalyzeArgs),

    /// Validate an analysis configuration file
    Validate(ValidateArgs),

    /// Summarize a RAW trace without analyzing it
    Inspect(InspectArgs),
}

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Scenario file the run executed
    pub scenario: PathBuf,

    /// RAW trace csv (default: most recent one for the scenario)
    #[arg(long)]
    pub raw_file: Option<PathBuf>,

    /// ANDROID log csv (default: most recent one for the scenario)
    #[arg(long)]
    pub android_log: Option<PathBuf>,

    /// Directory searched for measurement files
    #[arg(long, env = "ENERGY_SYNC_MEASUREMENTS_DIR")]
    pub measurements_dir: Option<PathBuf>,

    /// Analysis configuration file (TOML or JSON)
    #[arg(short, long, env = "ENERGY_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Resolve and print input and output files, then exit
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "energy-sync.toml", env = "ENERGY_SYNC_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `inspect` command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// RAW trace csv
    #[arg(long)]
    pub raw_file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_overrides() {
        let cli = Cli::try_parse_from([
            "energy-sync",
            "-v",
            "analyze",
            "scenarios/idle.scenario",
            "--raw-file",
            "m/idle_20240101_0000_raw.csv",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.scenario, PathBuf::from("scenarios/idle.scenario"));
                assert!(args.raw_file.is_some());
                assert!(args.android_log.is_none());
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn inspect_requires_raw_file() {
        assert!(Cli::try_parse_from(["energy-sync", "inspect"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let args = ["energy-sync", "-q", "-v", "inspect", "--raw-file", "x"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
