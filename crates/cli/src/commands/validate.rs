//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AnalysisConfig, SinkType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    sync_blocks: usize,
    edges_per_block: usize,
    expected_edges: usize,
    expected_sync_entries: usize,
    sync_operation: String,
    measurements_dir: String,
    sink_count: usize,
}

impl From<&AnalysisConfig> for ConfigSummary {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            version: format!("{:?}", config.version),
            sync_blocks: config.sync.sync_blocks,
            edges_per_block: config.sync.edges_per_block,
            expected_edges: config.sync.total_edges(),
            expected_sync_entries: config.sync.sync_log_entries(),
            sync_operation: config.sync.sync_operation.clone(),
            measurements_dir: config.files.measurements_dir.clone(),
            sink_count: config.sinks.len(),
        }
    }
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary::from(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &AnalysisConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.sinks.is_empty() {
        warnings.push("No sinks configured - analysis results will be discarded".to_string());
    } else if config
        .sinks
        .iter()
        .all(|sink| sink.sink_type == SinkType::Log)
    {
        warnings.push("Only log sinks configured - no output files will be written".to_string());
    }

    if !config
        .sinks
        .iter()
        .any(|sink| sink.sink_type == SinkType::SectionsCsv)
        && !config.sinks.is_empty()
    {
        warnings.push("No sections_csv sink - per-operation rows will not be saved".to_string());
    }

    if config.sync.total_edges() < 4 {
        warnings.push(format!(
            "Only {} sync edges expected - clock offset dispersion will be poorly estimated",
            config.sync.total_edges()
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!(
                "  Sync: {} block(s) x {} edges, {} '{}' log entries expected",
                summary.sync_blocks,
                summary.edges_per_block,
                summary.expected_sync_entries,
                summary.sync_operation
            );
            println!("  Measurements: {}", summary.measurements_dir);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
