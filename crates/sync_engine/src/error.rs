//! Fatal preconditions of an analysis run.

use std::fmt;

use thiserror::Error;

/// Which end of the RAW trace violated the pin precondition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEnd {
    First,
    Last,
}

impl fmt::Display for TraceEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEnd::First => write!(f, "first"),
            TraceEnd::Last => write!(f, "last"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    #[error("scenario has no operations")]
    EmptyScenario,

    #[error("RAW trace has no samples")]
    EmptyRawTrace,

    #[error("ANDROID log has no entries")]
    EmptyAndroidLog,

    #[error(
        "ANDROID log has {android_entries} entries, expected {} \
         ({scenario_operations} operations + {sync_entries} sync)",
        .scenario_operations + .sync_entries
    )]
    CountMismatch {
        scenario_operations: usize,
        sync_entries: usize,
        android_entries: usize,
    },

    #[error("sync pin is not low at the {end} sample (index {index}, t={time:.6}s)")]
    PinNotLow {
        end: TraceEnd,
        index: usize,
        time: f64,
    },

    #[error("only {available} edge/sync pairs available, at least {required} required")]
    InsufficientSyncPairs { available: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_mismatch_message_shows_expected_total() {
        let err = SyncError::CountMismatch {
            scenario_operations: 3,
            sync_entries: 16,
            android_entries: 18,
        };
        let msg = err.to_string();
        assert!(msg.contains("18 entries"));
        assert!(msg.contains("expected 19 (3 operations + 16 sync)"));
    }

    #[test]
    fn pin_not_low_names_position() {
        let err = SyncError::PinNotLow {
            end: TraceEnd::Last,
            index: 9,
            time: 0.9,
        };
        assert!(err.to_string().contains("last sample"));
        assert!(err.to_string().contains("index 9"));
    }
}
