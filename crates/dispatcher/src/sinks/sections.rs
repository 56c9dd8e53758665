//! SectionsCsvSink - one CSV row per analyzed operation

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use contracts::{AnalysisReport, ContractError, ReportSink, SectionRow};
use tracing::{debug, info, instrument};

use super::write_output;

/// Header line of the sections file
pub const SECTIONS_HEADER: &str = "start,end,name,power,energy,debug";

/// Render rows as the sections CSV
///
/// Numeric columns use four decimals. Text columns are expected to be
/// CSV-safe already.
pub fn format_sections_csv(rows: &[SectionRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(SECTIONS_HEADER);
    out.push('\n');
    for row in rows {
        // String formatting cannot fail
        let _ = writeln!(
            out,
            "{:.4},{:.4},{},{:.4},{:.4},{}",
            row.start, row.end, row.name, row.power_avg, row.energy, row.debug
        );
    }
    out
}

/// Writes `<run>_sections.csv`
pub struct SectionsCsvSink {
    name: String,
    path: PathBuf,
    written: usize,
}

impl SectionsCsvSink {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for SectionsCsvSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "sections_sink_write",
        skip(self, report),
        fields(sink = %self.name, rows = report.rows.len())
    )]
    async fn write(&mut self, report: &AnalysisReport) -> Result<(), ContractError> {
        write_output(&self.name, &self.path, format_sections_csv(&report.rows)).await?;
        self.written += report.rows.len();
        debug!(path = %self.path.display(), "Sections written");
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        info!(
            sink = %self.name,
            path = %self.path.display(),
            rows = self.written,
            "Sections file closed"
        );
        Ok(())
    }
}
