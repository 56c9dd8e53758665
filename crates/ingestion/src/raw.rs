//! RAW power trace reader.
//!
//! Format: header `time_s,power_mw,input_pin`, then one `%.6f,%d,%d` row per sample.

use contracts::{PinState, Sample};
use tracing::debug;

use crate::error::{IngestionError, Result};

const SOURCE: &str = "raw";

/// Header written by the capture tool
pub const RAW_HEADER: &str = "time_s,power_mw,input_pin";

/// Parse a RAW trace csv into ordered samples
///
/// The first line is the header and is skipped. Blank lines are ignored.
/// Sample times must be non-decreasing.
pub fn parse_raw_trace(content: &str) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    let mut previous: Option<f64> = None;

    for (idx, line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let sample = parse_row(line, line_no)?;
        if let Some(prev) = previous {
            if sample.time < prev {
                return Err(IngestionError::TimeNotMonotonic {
                    line: line_no,
                    previous: prev,
                    time: sample.time,
                });
            }
        }
        previous = Some(sample.time);
        samples.push(sample);
    }

    metrics::counter!("energy_sync_rows_parsed_total", "source" => SOURCE)
        .increment(samples.len() as u64);
    debug!(samples = samples.len(), "RAW trace parsed");
    Ok(samples)
}

fn parse_row(line: &str, line_no: usize) -> Result<Sample> {
    let mut fields = line.split(',').map(str::trim);
    let (Some(time), Some(power), Some(pin)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(IngestionError::parse(
            SOURCE,
            line_no,
            format!("expected 3 columns, got '{line}'"),
        ));
    };

    let time: f64 = time
        .parse()
        .map_err(|e| IngestionError::parse(SOURCE, line_no, format!("bad time '{time}': {e}")))?;
    // NaN would slip past the ordering check
    if !time.is_finite() {
        return Err(IngestionError::parse(
            SOURCE,
            line_no,
            format!("time '{time}' is not finite"),
        ));
    }
    let power: i64 = power
        .parse()
        .map_err(|e| IngestionError::parse(SOURCE, line_no, format!("bad power '{power}': {e}")))?;
    let pin_state = pin
        .parse::<u8>()
        .ok()
        .and_then(PinState::from_level)
        .ok_or_else(|| IngestionError::parse(SOURCE, line_no, format!("bad pin state '{pin}'")))?;

    Ok(Sample::new(time, power, pin_state))
}

/// Render samples back to the RAW csv format
pub fn format_raw_trace(samples: &[Sample]) -> String {
    let mut out = String::with_capacity(RAW_HEADER.len() + samples.len() * 24);
    out.push_str(RAW_HEADER);
    out.push('\n');
    for sample in samples {
        out.push_str(&format!(
            "{:.6},{},{}\n",
            sample.time,
            sample.power,
            sample.pin_state.level()
        ));
    }
    out
}
