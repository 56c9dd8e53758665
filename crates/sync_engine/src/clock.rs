//! Clock Synchronizer: ANDROID -> RAW offset from paired sync pulses.

use contracts::{AndroidEvent, ClockMapping, SyncGeometry};
use observability::RunningStats;
use tracing::{debug, warn};

use crate::error::{Result, SyncError};

/// Minimum number of pairs needed for an offset and its dispersion
pub const MIN_SYNC_PAIRS: usize = 2;

/// Pairs RAW rising edges with ANDROID `sync` events
#[derive(Debug, Clone)]
pub struct ClockSynchronizer {
    geometry: SyncGeometry,
}

impl ClockSynchronizer {
    pub fn new(geometry: SyncGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &SyncGeometry {
        &self.geometry
    }

    /// Compute the constant offset between the two clocks
    ///
    /// The i-th rising edge is paired with the i-th sync event, up to
    /// `total_edges` pairs. `offset` is the mean of `start_ts - edge` and
    /// `dispersion` its sample standard deviation.
    pub fn synchronize(&self, rising: &[f64], events: &[AndroidEvent]) -> Result<ClockMapping> {
        let expected = self.geometry.total_edges();

        let deltas: RunningStats = events
            .iter()
            .filter(|event| event.is_sync(&self.geometry.sync_operation))
            .zip(rising)
            .take(expected)
            .map(|(event, edge)| event.start_ts - edge)
            .collect();

        let pairs = deltas.count() as usize;
        if pairs < MIN_SYNC_PAIRS {
            return Err(SyncError::InsufficientSyncPairs {
                available: pairs,
                required: MIN_SYNC_PAIRS,
            });
        }
        if pairs < expected {
            warn!(
                pairs,
                expected, "Fewer sync pairs than expected, clock offset is less reliable"
            );
        }

        let mapping = ClockMapping {
            offset: deltas.mean(),
            dispersion: deltas.std_dev(),
            pairs,
        };
        debug!(
            offset = mapping.offset,
            dispersion = mapping.dispersion,
            pairs,
            "Clock offset computed"
        );
        Ok(mapping)
    }
}
