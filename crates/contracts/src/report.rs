//! AnalysisReport - Sync Engine output
//!
//! Per-operation rows plus run metadata, ready for the sinks.

use serde::{Deserialize, Serialize};

/// One output row per non-sync ANDROID event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    /// First sample time inside the window (RAW clock, seconds)
    pub start: f64,

    /// Last sample time inside the window (RAW clock, seconds)
    pub end: f64,

    /// Operation name
    pub name: String,

    /// Mean power over the window (milliwatts)
    pub power_avg: f64,

    /// `power_avg * (end - start)` (millijoules)
    pub energy: f64,

    /// Debug column copied from the ANDROID log
    pub debug: String,

    /// No RAW samples fell inside the window
    #[serde(default)]
    pub empty: bool,
}

impl SectionRow {
    /// Zeroed row emitted when no RAW samples fall inside the window
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            name: name.into(),
            power_avg: 0.0,
            energy: 0.0,
            debug: String::new(),
            empty: true,
        }
    }
}

/// Run metadata written next to the sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    /// RAW time of ANDROID time zero, `to_raw(0.0)` (seconds)
    pub clock_offset: f64,

    /// Standard deviation of the per-pair offsets (seconds)
    pub clock_offset_stdev: f64,

    /// Number of edge/event pairs used for the offset
    pub sync_pairs: usize,

    /// Rising edges detected in the RAW trace
    pub rising_edges: usize,

    /// Falling edges detected in the RAW trace
    pub falling_edges: usize,

    /// Number of emitted sections
    pub sections: usize,

    /// Sections with no RAW samples in their window
    pub empty_sections: usize,
}

/// Complete result of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub info: RunInfo,
    pub rows: Vec<SectionRow>,
}

/// Make a text field safe for the comma separated outputs.
///
/// Delimiters and line breaks are replaced by `;` and a space respectively.
pub fn csv_safe(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            ',' => ';',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
