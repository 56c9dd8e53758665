//! Device-side records: ANDROID log events and scenario operations

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operation tag the device uses for sync pulse log entries
pub const SYNC_OPERATION: &str = "sync";

/// One row of the ANDROID execution log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidEvent {
    /// Scenario name (identical for every row of one log)
    pub scenario: String,

    /// Operation name, `"sync"` for sync pulse markers
    pub operation: String,

    /// Start timestamp on the device clock (seconds)
    pub start_ts: f64,

    /// End timestamp on the device clock (seconds)
    pub end_ts: f64,

    /// Free-form debug column
    pub debug: String,
}

impl AndroidEvent {
    /// Whether this row is a sync pulse marker for the given tag
    pub fn is_sync(&self, sync_operation: &str) -> bool {
        self.operation == sync_operation
    }
}

/// A single logical operation of a scenario file
///
/// Only the count of operations matters to the analysis; the fields are kept
/// for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOperation {
    /// Display name
    pub name: String,

    /// Operation implementation name on the device
    pub op_name: String,

    /// Operation parameters (`k=v` pairs)
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}
