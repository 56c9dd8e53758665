//! SinkHandle - owns one sink behind its own queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use contracts::{AnalysisReport, ReportSink};

use crate::metrics::SinkMetrics;

/// Handle to a running sink worker
pub struct SinkHandle {
    name: String,
    tx: mpsc::Sender<Arc<AnalysisReport>>,
    metrics: Arc<SinkMetrics>,
    worker_handle: JoinHandle<()>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task
    pub fn spawn<S: ReportSink + 'static>(sink: S, queue_capacity: usize) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());

        let worker_metrics = Arc::clone(&metrics);
        let worker_name = name.clone();

        let worker_handle = tokio::spawn(async move {
            sink_worker(sink, rx, worker_metrics, worker_name).await;
        });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Queue a report, waiting while the sink's queue is full
    ///
    /// Returns false if the worker has already stopped.
    pub async fn send(&self, report: Arc<AnalysisReport>) -> bool {
        match self.tx.send(report).await {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                true
            }
            Err(_) => {
                self.metrics.inc_dropped_count();
                error!(sink = %self.name, "Sink worker closed unexpectedly, report dropped");
                false
            }
        }
    }

    /// Close the queue and wait for the worker to drain it
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) -> Arc<SinkMetrics> {
        drop(self.tx);
        if let Err(e) = self.worker_handle.await {
            self.metrics.inc_failure_count();
            error!(sink = %self.name, error = ?e, "Worker task panicked");
        }
        debug!(sink = %self.name, "SinkHandle shutdown complete");
        self.metrics
    }
}

#[instrument(
    name = "sink_worker_loop",
    skip(sink, rx, metrics),
    fields(sink = %name)
)]
async fn sink_worker<S: ReportSink>(
    mut sink: S,
    mut rx: mpsc::Receiver<Arc<AnalysisReport>>,
    metrics: Arc<SinkMetrics>,
    name: String,
) {
    debug!("Sink worker started");

    while let Some(report) = rx.recv().await {
        metrics.set_queue_len(rx.len());

        match sink.write(&report).await {
            Ok(()) => metrics.inc_write_count(),
            Err(e) => {
                metrics.inc_failure_count();
                error!(
                    sections = report.rows.len(),
                    error = %e,
                    "Write failed"
                );
            }
        }
    }

    if let Err(e) = sink.flush().await {
        metrics.inc_failure_count();
        error!(error = %e, "Flush failed on shutdown");
    }
    if let Err(e) = sink.close().await {
        metrics.inc_failure_count();
        error!(error = %e, "Close failed on shutdown");
    }

    debug!("Sink worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ContractError;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::time::{sleep, Duration};

    struct MockSink {
        name: String,
        write_count: Arc<AtomicU64>,
        should_fail: bool,
        delay_ms: u64,
    }

    impl ReportSink for MockSink {
        fn name(&self) -> &str {
            &self.name
        }

        async fn write(&mut self, _report: &AnalysisReport) -> Result<(), ContractError> {
            if self.delay_ms > 0 {
                sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.should_fail {
                return Err(ContractError::sink_write(&self.name, "mock failure"));
            }
            self.write_count.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    fn mock(name: &str, should_fail: bool, delay_ms: u64) -> (MockSink, Arc<AtomicU64>) {
        let write_count = Arc::new(AtomicU64::new(0));
        let sink = MockSink {
            name: name.to_string(),
            write_count: Arc::clone(&write_count),
            should_fail,
            delay_ms,
        };
        (sink, write_count)
    }

    #[tokio::test]
    async fn test_sink_handle_basic() {
        let (sink, write_count) = mock("test", false, 0);
        let handle = SinkHandle::spawn(sink, 4);

        for _ in 0..3 {
            assert!(handle.send(Arc::new(AnalysisReport::default())).await);
        }

        let metrics = handle.shutdown().await;
        assert_eq!(write_count.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.write_count(), 3);
        assert!(!metrics.has_failures());
    }

    #[tokio::test]
    async fn test_slow_sink_applies_backpressure() {
        let (sink, write_count) = mock("slow", false, 20);
        let handle = SinkHandle::spawn(sink, 1);

        for _ in 0..4 {
            assert!(handle.send(Arc::new(AnalysisReport::default())).await);
        }

        let metrics = handle.shutdown().await;
        assert_eq!(write_count.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.dropped_count(), 0);
    }

    #[tokio::test]
    async fn test_sink_handle_failure_isolation() {
        let (sink, _) = mock("failing", true, 0);
        let handle = SinkHandle::spawn(sink, 4);

        for _ in 0..2 {
            handle.send(Arc::new(AnalysisReport::default())).await;
        }

        let metrics = handle.shutdown().await;
        assert_eq!(metrics.failure_count(), 2);
        assert!(metrics.has_failures());
    }
}
