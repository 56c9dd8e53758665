//! ANDROID execution log reader.
//!
//! Format: header `scenario,operation,ts,te,debug`, timestamps in seconds.

use contracts::AndroidEvent;
use tracing::debug;

use crate::error::{IngestionError, Result};

const SOURCE: &str = "android";

/// Header written by the device
pub const ANDROID_HEADER: &str = "scenario,operation,ts,te,debug";

/// Parse an ANDROID log
///
/// Every row must belong to the same scenario. When `scenario_name` is given
/// it is enforced, otherwise the first row decides.
pub fn parse_android_log(content: &str, scenario_name: Option<&str>) -> Result<Vec<AndroidEvent>> {
    let mut events = Vec::new();
    let mut expected = scenario_name.map(str::to_string);

    for (idx, line) in content.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let event = parse_row(line, line_no)?;
        match &expected {
            None => expected = Some(event.scenario.clone()),
            Some(name) if *name != event.scenario => {
                return Err(IngestionError::ScenarioMismatch {
                    line: line_no,
                    expected: name.clone(),
                    found: event.scenario,
                });
            }
            Some(_) => {}
        }
        events.push(event);
    }

    metrics::counter!("energy_sync_rows_parsed_total", "source" => SOURCE)
        .increment(events.len() as u64);
    debug!(events = events.len(), scenario = ?expected, "ANDROID log parsed");
    Ok(events)
}

fn parse_row(line: &str, line_no: usize) -> Result<AndroidEvent> {
    // debug is the last column and keeps any further commas
    let fields: Vec<&str> = line.splitn(5, ',').collect();
    if fields.len() < 5 {
        return Err(IngestionError::parse(
            SOURCE,
            line_no,
            format!("expected 5 columns, got {}", fields.len()),
        ));
    }

    let parse_ts = |value: &str, column: &str| -> Result<f64> {
        let ts: f64 = value.trim().parse().map_err(|e| {
            IngestionError::parse(SOURCE, line_no, format!("bad {column} '{value}': {e}"))
        })?;
        if ts.is_finite() {
            Ok(ts)
        } else {
            Err(IngestionError::parse(
                SOURCE,
                line_no,
                format!("{column} '{value}' is not finite"),
            ))
        }
    };

    let start_ts = parse_ts(fields[2], "ts")?;
    let end_ts = parse_ts(fields[3], "te")?;
    if end_ts < start_ts {
        return Err(IngestionError::parse(
            SOURCE,
            line_no,
            format!("te {end_ts} is earlier than ts {start_ts}"),
        ));
    }

    Ok(AndroidEvent {
        scenario: fields[0].trim().to_string(),
        operation: fields[1].trim().to_string(),
        start_ts,
        end_ts,
        debug: fields[4].trim().to_string(),
    })
}

/// Render events back to the ANDROID log format
pub fn format_android_log(events: &[AndroidEvent]) -> String {
    let mut out = String::from(ANDROID_HEADER);
    out.push('\n');
    for event in events {
        out.push_str(&format!(
            "{},{},{:.6},{:.6},{}\n",
            event.scenario, event.operation, event.start_ts, event.end_ts, event.debug
        ));
    }
    out
}
