//! Sample - Trace Reader output for the RAW power trace

use serde::{Deserialize, Serialize};

/// State of the digital sync input pin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinState {
    #[default]
    Low,
    High,
}

impl PinState {
    /// Map the raw `0|1` column value. Anything else is rejected.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Low),
            1 => Some(Self::High),
            _ => None,
        }
    }

    /// Numeric level as written in the RAW csv
    pub fn level(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }
}

/// One RAW trace sample
///
/// Samples are ordered by `time` (non-decreasing) and never mutated after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Monitor clock time (seconds)
    pub time: f64,

    /// Instantaneous power (milliwatts)
    pub power: i64,

    /// Sync pin state at this sample
    pub pin_state: PinState,
}

impl Sample {
    pub fn new(time: f64, power: i64, pin_state: PinState) -> Self {
        Self {
            time,
            power,
            pin_state,
        }
    }
}
