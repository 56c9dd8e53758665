//! Pipeline orchestrator - locates the run's files and drives all components.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{AnalysisConfig, FileLayout};
use dispatcher::{create_dispatcher, OutputPaths};
use ingestion::{
    basename_from_scenario_path, derive_output_path, load_inputs, most_recent_file, InputPaths,
};
use observability::SectionMetricsAggregator;
use sync_engine::SyncEngine;
use tokio::sync::mpsc;
use tracing::{info, instrument};

use super::PipelineStats;
use crate::error::CliError;

/// Files taking part in one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub basename: String,
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
}

impl RunPlan {
    /// Resolve measurement files for a scenario
    ///
    /// Explicit paths win; otherwise the most recent matching file in
    /// `measurements_dir` is used. Outputs sit next to the RAW file.
    pub fn resolve(
        scenario: &Path,
        raw_file: Option<PathBuf>,
        android_log: Option<PathBuf>,
        measurements_dir: &Path,
        files: &FileLayout,
    ) -> Result<Self, CliError> {
        let basename = basename_from_scenario_path(scenario, &files.scenario_extension);

        let raw = match raw_file {
            Some(path) => path,
            None => most_recent_file(measurements_dir, &basename, &files.raw_suffix)?
                .ok_or_else(|| {
                    CliError::measurement_not_found("RAW", &basename, measurements_dir)
                })?,
        };
        let android = match android_log {
            Some(path) => path,
            None => most_recent_file(measurements_dir, &basename, &files.android_suffix)?
                .ok_or_else(|| {
                    CliError::measurement_not_found("ANDROID", &basename, measurements_dir)
                })?,
        };

        let derive = |to_suffix: &str| {
            derive_output_path(&raw, &files.raw_suffix, to_suffix).ok_or_else(|| {
                CliError::UnexpectedRawName {
                    path: raw.clone(),
                    suffix: files.raw_suffix.clone(),
                }
            })
        };
        let outputs = OutputPaths {
            sections: derive(&files.sections_suffix)?,
            info: derive(&files.info_suffix)?,
        };

        Ok(Self {
            basename,
            inputs: InputPaths {
                scenario: scenario.to_path_buf(),
                raw,
                android,
            },
            outputs,
        })
    }
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: AnalysisConfig,
    plan: RunPlan,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig, plan: RunPlan) -> Self {
        Self { config, plan }
    }

    /// LOAD -> ANALYZE -> EMIT
    #[instrument(name = "pipeline_run", skip(self), fields(basename = %self.plan.basename))]
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        // 1. Load all three inputs
        let inputs = load_inputs(&self.plan.inputs)
            .await
            .context("Failed to load input files")?;

        // 2. Analyze
        let engine = SyncEngine::new(self.config.sync.clone());
        let report = engine
            .analyze(&inputs.scenario, &inputs.samples, &inputs.events)
            .context("Analysis aborted")?;

        let mut section_metrics = SectionMetricsAggregator::new();
        for row in &report.rows {
            section_metrics.update(row);
        }

        // 3. Emit through the sinks
        let (report_tx, report_rx) = mpsc::channel(1);
        let dispatcher = create_dispatcher(
            self.config.sinks.clone(),
            self.plan.outputs.clone(),
            report_rx,
        )
        .context("Failed to create sinks")?;
        let active_sinks = dispatcher.sink_names().len();
        let dispatch_task = dispatcher.spawn();

        let info = report.info.clone();
        report_tx
            .send(report)
            .await
            .context("Dispatcher stopped before receiving the report")?;
        drop(report_tx);

        let dispatch = dispatch_task
            .await
            .context("Dispatcher task panicked")?
            .context("Failed to write outputs")?;

        info!(
            sections = %self.plan.outputs.sections.display(),
            info = %self.plan.outputs.info.display(),
            "Outputs written"
        );

        Ok(PipelineStats {
            duration: start_time.elapsed(),
            operations: inputs.scenario.len(),
            samples: inputs.samples.len(),
            events: inputs.events.len(),
            active_sinks,
            info,
            section_metrics,
            sinks: dispatch.sinks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn resolves_most_recent_measurements() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "idle_20240101_0900_raw.csv");
        touch(dir.path(), "idle_20240102_0900_raw.csv");
        touch(dir.path(), "idle_20240102_0900_android.csv");

        let plan = RunPlan::resolve(
            Path::new("scenarios/idle.scenario"),
            None,
            None,
            dir.path(),
            &FileLayout::default(),
        )
        .unwrap();

        assert_eq!(plan.basename, "idle");
        assert_eq!(plan.inputs.raw, dir.path().join("idle_20240102_0900_raw.csv"));
        assert_eq!(
            plan.inputs.android,
            dir.path().join("idle_20240102_0900_android.csv")
        );
        assert_eq!(
            plan.outputs.sections,
            dir.path().join("idle_20240102_0900_sections.csv")
        );
        assert_eq!(plan.outputs.info, dir.path().join("idle_20240102_0900_info.json"));
    }

    #[test]
    fn explicit_paths_skip_discovery() {
        let plan = RunPlan::resolve(
            Path::new("idle.scenario"),
            Some(PathBuf::from("elsewhere/run_raw.csv")),
            Some(PathBuf::from("elsewhere/run_android.csv")),
            Path::new("/does/not/exist"),
            &FileLayout::default(),
        )
        .unwrap();
        assert_eq!(plan.outputs.sections, PathBuf::from("elsewhere/run_sections.csv"));
    }

    #[test]
    fn missing_android_log_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "idle_20240101_0900_raw.csv");

        let err = RunPlan::resolve(
            Path::new("idle.scenario"),
            None,
            None,
            dir.path(),
            &FileLayout::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::MeasurementNotFound { kind: "ANDROID", .. }));
    }

    #[test]
    fn raw_name_without_suffix_is_rejected() {
        let err = RunPlan::resolve(
            Path::new("idle.scenario"),
            Some(PathBuf::from("trace.csv")),
            Some(PathBuf::from("log.csv")),
            Path::new("."),
            &FileLayout::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("_raw.csv"));
    }
}
