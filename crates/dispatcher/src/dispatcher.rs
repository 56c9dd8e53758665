//! Dispatcher - fans analysis reports out to the configured sinks

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use contracts::{AnalysisReport, SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{InfoJsonSink, LogSink, SectionsCsvSink};

/// Output files of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub sections: PathBuf,
    pub info: PathBuf,
}

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub sinks: Vec<SinkConfig>,
    pub outputs: OutputPaths,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    input_rx: mpsc::Receiver<AnalysisReport>,
}

impl DispatcherBuilder {
    pub fn new(config: DispatcherConfig, input_rx: mpsc::Receiver<AnalysisReport>) -> Self {
        Self { config, input_rx }
    }

    /// Build the dispatcher and start one worker per sink
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.config.sinks.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let handles = self
            .config
            .sinks
            .iter()
            .map(|sink_config| create_sink_handle(sink_config, &self.config.outputs))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dispatcher {
            handles,
            input_rx: self.input_rx,
        })
    }
}

#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config, outputs),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(
    config: &SinkConfig,
    outputs: &OutputPaths,
) -> Result<SinkHandle, DispatcherError> {
    if config.queue_capacity == 0 {
        return Err(DispatcherError::sink_creation(
            &config.name,
            "queue_capacity must be > 0",
        ));
    }

    let handle = match config.sink_type {
        SinkType::Log => SinkHandle::spawn(LogSink::new(&config.name), config.queue_capacity),
        SinkType::SectionsCsv => SinkHandle::spawn(
            SectionsCsvSink::new(&config.name, &outputs.sections),
            config.queue_capacity,
        ),
        SinkType::InfoJson => SinkHandle::spawn(
            InfoJsonSink::new(&config.name, &outputs.info),
            config.queue_capacity,
        ),
    };
    Ok(handle)
}

/// Per-sink results after the dispatcher has drained
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub reports: u64,
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

/// Fans reports out to every sink
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<AnalysisReport>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(
        handles: Vec<SinkHandle>,
        input_rx: mpsc::Receiver<AnalysisReport>,
    ) -> Self {
        Self { handles, input_rx }
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.handles.iter().map(SinkHandle::name).collect()
    }

    /// Run until the input channel closes, then drain every sink
    ///
    /// Fails if any sink failed to write any report.
    #[instrument(name = "dispatcher_run", skip(self), fields(sinks = self.handles.len()))]
    pub async fn run(mut self) -> Result<DispatchSummary, DispatcherError> {
        info!("Dispatcher started");

        let mut reports: u64 = 0;
        while let Some(report) = self.input_rx.recv().await {
            reports += 1;
            let report = Arc::new(report);
            for handle in &self.handles {
                handle.send(Arc::clone(&report)).await;
            }
            debug!(reports, "Report dispatched");
        }

        let mut summary = DispatchSummary {
            reports,
            sinks: Vec::with_capacity(self.handles.len()),
        };
        let mut failed = Vec::new();
        for handle in self.handles {
            let name = handle.name().to_string();
            let metrics = handle.shutdown().await;
            if metrics.has_failures() {
                warn!(sink = %name, failures = metrics.failure_count(), "Sink reported failures");
                failed.push(name.clone());
            }
            summary.sinks.push((name, metrics.snapshot()));
        }

        info!(reports, "Dispatcher shutdown complete");

        if failed.is_empty() {
            Ok(summary)
        } else {
            Err(DispatcherError::SinkFailures { sinks: failed })
        }
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<Result<DispatchSummary, DispatcherError>> {
        tokio::spawn(self.run())
    }
}

/// Convenience function to create a dispatcher from sink configs
pub fn create_dispatcher(
    sinks: Vec<SinkConfig>,
    outputs: OutputPaths,
    input_rx: mpsc::Receiver<AnalysisReport>,
) -> Result<Dispatcher, DispatcherError> {
    DispatcherBuilder::new(DispatcherConfig { sinks, outputs }, input_rx).build()
}
