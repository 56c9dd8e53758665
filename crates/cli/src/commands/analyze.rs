//! `analyze` command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, RunPlan};

/// Execute the `analyze` command
pub async fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    if let Some(path) = args.config.as_deref() {
        if !path.exists() {
            return Err(CliError::config_not_found(path).into());
        }
    }
    let config = config_loader::ConfigLoader::load_or_default(args.config.as_deref())
        .context("Failed to load analysis config")?;

    let measurements_dir = args
        .measurements_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.files.measurements_dir));

    info!(scenario = %args.scenario.display(), "Resolving measurement files");
    let plan = RunPlan::resolve(
        &args.scenario,
        args.raw_file.clone(),
        args.android_log.clone(),
        &measurements_dir,
        &config.files,
    )?;

    info!(
        raw = %plan.inputs.raw.display(),
        android = %plan.inputs.android.display(),
        sections = %plan.outputs.sections.display(),
        info = %plan.outputs.info.display(),
        "All files resolved"
    );

    if args.dry_run {
        info!("Dry run mode - files resolved, exiting");
        print_plan(&plan);
        return Ok(());
    }

    let stats = Pipeline::new(config, plan).run().await?;

    info!(
        sections = stats.info.sections,
        empty_sections = stats.info.empty_sections,
        duration_secs = stats.duration.as_secs_f64(),
        "Analysis completed successfully"
    );
    stats.print_summary();

    Ok(())
}

/// Print resolved files for dry-run mode
fn print_plan(plan: &RunPlan) {
    println!("\n=== Run Plan ({}) ===\n", plan.basename);
    println!("Inputs:");
    println!("  Scenario: {}", plan.inputs.scenario.display());
    println!("  RAW:      {}", plan.inputs.raw.display());
    println!("  ANDROID:  {}", plan.inputs.android.display());
    println!("\nOutputs:");
    println!("  Sections: {}", plan.outputs.sections.display());
    println!("  Info:     {}", plan.outputs.info.display());
    println!();
}
