//! Synthetic Run Example
//!
//! Generates a measurement set with a known clock offset, then runs the full
//! analysis on it. No power meter or device is needed.
//!
//! Run with: cargo run -p demos --bin synthetic_run -- [OUT_DIR] [CONFIG]

use std::path::{Path, PathBuf};

use config_loader::ConfigLoader;
use contracts::AnalysisReport;
use dispatcher::{create_dispatcher, OutputPaths};
use ingestion::{
    derive_output_path, load_inputs, SyntheticCapture, SyntheticConfig, SyntheticOperation,
};
use observability::SectionMetricsAggregator;
use sync_engine::SyncEngine;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("Starting Synthetic Run Demo");

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("energy-sync-demo"));
    let config_path = std::env::args().nth(2).map(PathBuf::from);

    // ==== Stage 1: Configuration ====
    let config = ConfigLoader::load_or_default(config_path.as_deref())?;

    // ==== Stage 2: Generate the measurement files ====
    let synthetic = SyntheticConfig {
        scenario: "demo".to_string(),
        geometry: config.sync.clone(),
        clock_offset_s: 1_718_000_000.25,
        ..Default::default()
    };
    let operations = vec![
        SyntheticOperation::new("screen_on", 2.0, 180),
        SyntheticOperation::new("scroll", 1.5, 420),
        SyntheticOperation::new("video", 3.0, 650),
        SyntheticOperation::new("screen_off", 1.0, 40),
    ];
    let capture = SyntheticCapture::generate(&synthetic, &operations);

    tokio::fs::create_dir_all(&out_dir).await?;
    let at = chrono::Local::now().naive_local();
    let paths = capture
        .write_to(&out_dir, &synthetic.scenario, at, &config.files)
        .await?;
    tracing::info!(
        raw = %paths.raw.display(),
        android = %paths.android.display(),
        "Measurement files written"
    );

    // ==== Stage 3: Analyze ====
    let inputs = load_inputs(&paths).await?;
    let report = SyncEngine::new(config.sync.clone()).analyze(
        &inputs.scenario,
        &inputs.samples,
        &inputs.events,
    )?;

    let mut section_metrics = SectionMetricsAggregator::new();
    for row in &report.rows {
        section_metrics.update(row);
    }

    for (row, window) in report.rows.iter().zip(&capture.windows) {
        tracing::info!(
            operation = %row.name,
            energy_mj = format!("{:.3}", row.energy),
            expected_mj = format!("{:.3}", window.energy()),
            "Section"
        );
    }

    // ==== Stage 4: Emit ====
    let outputs = OutputPaths {
        sections: output_path(&paths.raw, &config.files.raw_suffix, &config.files.sections_suffix)?,
        info: output_path(&paths.raw, &config.files.raw_suffix, &config.files.info_suffix)?,
    };
    emit(report, config.sinks.clone(), outputs.clone()).await?;

    println!("{}", section_metrics.summary());
    println!("Sections: {}", outputs.sections.display());
    println!("Run info: {}", outputs.info.display());

    Ok(())
}

fn output_path(raw: &Path, from: &str, to: &str) -> Result<PathBuf, String> {
    derive_output_path(raw, from, to)
        .ok_or_else(|| format!("{} does not end in {from}", raw.display()))
}

async fn emit(
    report: AnalysisReport,
    sinks: Vec<contracts::SinkConfig>,
    outputs: OutputPaths,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(1);
    let task = create_dispatcher(sinks, outputs, rx)?.spawn();
    tx.send(report).await?;
    drop(tx);

    let summary = task.await??;
    for (name, snapshot) in &summary.sinks {
        tracing::info!(
            sink = %name,
            writes = snapshot.write_count,
            failures = snapshot.failure_count,
            "Sink finished"
        );
    }
    Ok(())
}
