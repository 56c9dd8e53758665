//! Clock sync results shared between the engine and reporting.

use serde::{Deserialize, Serialize};

/// Pin transition times found in a RAW trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncEdges {
    /// 0 -> 1 transition times (seconds, RAW clock)
    pub rising: Vec<f64>,

    /// 1 -> 0 transition times (seconds, RAW clock)
    pub falling: Vec<f64>,
}

impl SyncEdges {
    /// No transitions at all (missing sync pattern)
    pub fn is_empty(&self) -> bool {
        self.rising.is_empty() && self.falling.is_empty()
    }
}

/// ANDROID -> RAW clock mapping
///
/// A pure translation: `raw_time = android_time - offset`. No drift term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClockMapping {
    /// Mean of `android_sync_time - raw_edge_time` over all pairs (seconds)
    pub offset: f64,

    /// Sample standard deviation of the per-pair deltas (seconds)
    pub dispersion: f64,

    /// Number of edge/event pairs the estimate is based on
    pub pairs: usize,
}

impl ClockMapping {
    /// Convert an ANDROID timestamp to the RAW timeline
    #[inline]
    pub fn to_raw(&self, android_time: f64) -> f64 {
        android_time - self.offset
    }
}
