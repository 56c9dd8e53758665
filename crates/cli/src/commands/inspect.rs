//! `inspect` command implementation.

use anyhow::{Context, Result};
use contracts::Sample;
use observability::RunningStats;
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::InspectArgs;

/// RAW trace overview
#[derive(Debug, Serialize)]
struct TraceSummary {
    path: String,
    samples: usize,
    start_s: f64,
    end_s: f64,
    duration_s: f64,
    mean_power_mw: f64,
    min_power_mw: f64,
    max_power_mw: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rising_edges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    falling_edges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_error: Option<String>,
}

/// Execute the `inspect` command
pub async fn run_inspect(args: &InspectArgs) -> Result<()> {
    info!(raw = %args.raw_file.display(), "Inspecting RAW trace");

    let content = tokio::fs::read_to_string(&args.raw_file)
        .await
        .with_context(|| format!("Failed to read {}", args.raw_file.display()))?;
    let samples = ingestion::parse_raw_trace(&content)
        .with_context(|| format!("Failed to parse {}", args.raw_file.display()))?;

    let summary = summarize(args.raw_file.display().to_string(), &samples);

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize trace summary")?;
        println!("{}", json);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn summarize(path: String, samples: &[Sample]) -> TraceSummary {
    let power: RunningStats = samples.iter().map(|s| s.power as f64).collect();
    let start_s = samples.first().map_or(0.0, |s| s.time);
    let end_s = samples.last().map_or(0.0, |s| s.time);

    let (rising_edges, falling_edges, sync_error) = match sync_engine::find_sync_edges(samples) {
        Ok(edges) => (Some(edges.rising.len()), Some(edges.falling.len()), None),
        Err(e) => {
            warn!(error = %e, "Sync edges unavailable");
            (None, None, Some(e.to_string()))
        }
    };

    TraceSummary {
        path,
        samples: samples.len(),
        start_s,
        end_s,
        duration_s: end_s - start_s,
        mean_power_mw: power.mean(),
        min_power_mw: if power.count() > 0 { power.min() } else { 0.0 },
        max_power_mw: if power.count() > 0 { power.max() } else { 0.0 },
        rising_edges,
        falling_edges,
        sync_error,
    }
}

fn print_summary(summary: &TraceSummary) {
    println!("\n=== RAW trace: {} ===\n", summary.path);
    println!("  Samples:  {}", summary.samples);
    println!(
        "  Span:     {:.6}s .. {:.6}s ({:.3}s)",
        summary.start_s, summary.end_s, summary.duration_s
    );
    println!(
        "  Power:    mean {:.2} mW (min {:.0}, max {:.0})",
        summary.mean_power_mw, summary.min_power_mw, summary.max_power_mw
    );
    match (summary.rising_edges, summary.falling_edges, &summary.sync_error) {
        (Some(rising), Some(falling), _) => {
            println!("  Edges:    {} rising, {} falling", rising, falling)
        }
        (_, _, Some(error)) => println!("  Edges:    unavailable ({})", error),
        _ => {}
    }
    println!();
}
