//! Edge Detector: pin transitions in the RAW trace.

use contracts::{PinState, Sample, SyncEdges};
use tracing::debug;

use crate::error::{Result, SyncError, TraceEnd};

/// Extract rising and falling edge times from a RAW trace
///
/// The edge time is the time of the later sample of each transition. The
/// trace must start and end with the pin low, so the edges alternate and
/// `rising.len() == falling.len()`.
pub fn find_sync_edges(samples: &[Sample]) -> Result<SyncEdges> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(SyncError::EmptyRawTrace);
    };

    if first.pin_state != PinState::Low {
        return Err(SyncError::PinNotLow {
            end: TraceEnd::First,
            index: 0,
            time: first.time,
        });
    }
    if last.pin_state != PinState::Low {
        return Err(SyncError::PinNotLow {
            end: TraceEnd::Last,
            index: samples.len() - 1,
            time: last.time,
        });
    }

    let mut edges = SyncEdges::default();
    for pair in samples.windows(2) {
        match (pair[0].pin_state, pair[1].pin_state) {
            (PinState::Low, PinState::High) => edges.rising.push(pair[1].time),
            (PinState::High, PinState::Low) => edges.falling.push(pair[1].time),
            _ => {}
        }
    }

    debug!(
        rising = edges.rising.len(),
        falling = edges.falling.len(),
        samples = samples.len(),
        "Sync edges detected"
    );
    Ok(edges)
}
