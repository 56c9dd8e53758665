//! InfoJsonSink - run metadata as JSON

use std::path::PathBuf;

use contracts::{AnalysisReport, ContractError, ReportSink};
use tracing::{debug, instrument};

use super::write_output;

/// Writes `<run>_info.json` holding the `RunInfo`
pub struct InfoJsonSink {
    name: String,
    path: PathBuf,
}

impl InfoJsonSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl ReportSink for InfoJsonSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "info_sink_write", skip(self, report), fields(sink = %self.name))]
    async fn write(&mut self, report: &AnalysisReport) -> Result<(), ContractError> {
        let json = serde_json::to_string_pretty(&report.info)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        write_output(&self.name, &self.path, json).await?;
        debug!(path = %self.path.display(), "Run info written");
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
