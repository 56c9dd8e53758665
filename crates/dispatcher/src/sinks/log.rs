//! LogSink - logs a report summary via tracing

use contracts::{AnalysisReport, ContractError, ReportSink};
use tracing::{debug, info, instrument};

/// Sink that logs report summaries
pub struct LogSink {
    name: String,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &AnalysisReport) {
        let total_energy: f64 = report.rows.iter().map(|row| row.energy).sum();

        info!(
            sink = %self.name,
            clock_offset = report.info.clock_offset,
            clock_offset_stdev = report.info.clock_offset_stdev,
            sections = report.info.sections,
            empty_sections = report.info.empty_sections,
            total_energy_mj = total_energy,
            "AnalysisReport received"
        );

        for row in &report.rows {
            debug!(
                sink = %self.name,
                operation = %row.name,
                start = row.start,
                end = row.end,
                power_mw = row.power_avg,
                energy_mj = row.energy,
                "Section"
            );
        }
    }
}

impl ReportSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_write", skip(self, report), fields(sink = %self.name))]
    async fn write(&mut self, report: &AnalysisReport) -> Result<(), ContractError> {
        self.log_report_summary(report);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
