//! AnalysisConfig - Config Loader output
//!
//! Describes the sync fixture geometry, measurement file layout and output routing.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::SYNC_OPERATION;

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalysisConfig {
    /// Config version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Sync pulse fixture geometry
    #[serde(default)]
    #[validate(nested)]
    pub sync: SyncGeometry,

    /// Measurement file naming
    #[serde(default)]
    #[validate(nested)]
    pub files: FileLayout,

    /// Output routing
    #[serde(default = "default_sinks")]
    pub sinks: Vec<SinkConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            sync: SyncGeometry::default(),
            files: FileLayout::default(),
            sinks: default_sinks(),
        }
    }
}

/// Geometry of the sync pulse train the device emits before a scenario
///
/// The device toggles the pin `edges_per_block` times per block and logs
/// `log_entries_per_pulse` rows tagged `sync_operation` for every pulse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SyncGeometry {
    /// Number of sync blocks in one capture
    #[serde(default = "default_sync_blocks")]
    #[validate(range(min = 1))]
    pub sync_blocks: usize,

    /// Rising (and falling) edges per block
    #[serde(default = "default_edges_per_block")]
    #[validate(range(min = 2))]
    pub edges_per_block: usize,

    /// ANDROID log rows written per sync pulse
    #[serde(default = "default_log_entries_per_pulse")]
    #[validate(range(min = 1))]
    pub log_entries_per_pulse: usize,

    /// Operation tag of sync rows in the ANDROID log
    #[serde(default = "default_sync_operation")]
    #[validate(length(min = 1))]
    pub sync_operation: String,
}

impl SyncGeometry {
    /// Expected number of rising edges (and of falling edges)
    pub fn total_edges(&self) -> usize {
        self.sync_blocks * self.edges_per_block
    }

    /// Expected number of sync rows in the ANDROID log
    pub fn sync_log_entries(&self) -> usize {
        self.total_edges() * self.log_entries_per_pulse
    }
}

impl Default for SyncGeometry {
    fn default() -> Self {
        Self {
            sync_blocks: default_sync_blocks(),
            edges_per_block: default_edges_per_block(),
            log_entries_per_pulse: default_log_entries_per_pulse(),
            sync_operation: default_sync_operation(),
        }
    }
}

fn default_sync_blocks() -> usize {
    1
}

fn default_edges_per_block() -> usize {
    8
}

fn default_log_entries_per_pulse() -> usize {
    2
}

fn default_sync_operation() -> String {
    SYNC_OPERATION.to_string()
}

/// Measurement directory and file name conventions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FileLayout {
    /// Directory holding `<basename>_<stamp>_*` measurement files
    #[serde(default = "default_measurements_dir")]
    pub measurements_dir: String,

    /// Scenario file extension stripped to get the basename
    #[serde(default = "default_scenario_extension")]
    pub scenario_extension: String,

    /// RAW trace suffix
    #[serde(default = "default_raw_suffix")]
    #[validate(length(min = 1))]
    pub raw_suffix: String,

    /// ANDROID log suffix
    #[serde(default = "default_android_suffix")]
    #[validate(length(min = 1))]
    pub android_suffix: String,

    /// Sections output suffix (replaces `raw_suffix`)
    #[serde(default = "default_sections_suffix")]
    #[validate(length(min = 1))]
    pub sections_suffix: String,

    /// Run info output suffix (replaces `raw_suffix`)
    #[serde(default = "default_info_suffix")]
    #[validate(length(min = 1))]
    pub info_suffix: String,
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            measurements_dir: default_measurements_dir(),
            scenario_extension: default_scenario_extension(),
            raw_suffix: default_raw_suffix(),
            android_suffix: default_android_suffix(),
            sections_suffix: default_sections_suffix(),
            info_suffix: default_info_suffix(),
        }
    }
}

fn default_measurements_dir() -> String {
    "../measurements".to_string()
}

fn default_scenario_extension() -> String {
    ".scenario".to_string()
}

fn default_raw_suffix() -> String {
    "_raw.csv".to_string()
}

fn default_android_suffix() -> String {
    "_android.csv".to_string()
}

fn default_sections_suffix() -> String {
    "_sections.csv".to_string()
}

fn default_info_suffix() -> String {
    "_info.json".to_string()
}

/// Sink output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    4
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// Log a run summary
    Log,
    /// `<run>_sections.csv`
    SectionsCsv,
    /// `<run>_info.json`
    InfoJson,
}

fn default_sinks() -> Vec<SinkConfig> {
    vec![
        SinkConfig {
            name: "sections".to_string(),
            sink_type: SinkType::SectionsCsv,
            queue_capacity: default_queue_capacity(),
        },
        SinkConfig {
            name: "info".to_string(),
            sink_type: SinkType::InfoJson,
            queue_capacity: default_queue_capacity(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_matches_fixture() {
        let geometry = SyncGeometry::default();
        assert_eq!(geometry.total_edges(), 8);
        assert_eq!(geometry.sync_log_entries(), 16);
        assert_eq!(geometry.sync_operation, "sync");
    }

    #[test]
    fn geometry_validation_rejects_single_edge() {
        let geometry = SyncGeometry {
            edges_per_block: 1,
            ..Default::default()
        };
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.sync, SyncGeometry::default());
        assert_eq!(config.files.raw_suffix, "_raw.csv");
        assert_eq!(config.sinks.len(), 2);
        assert!(config.validate().is_ok());
    }
}
