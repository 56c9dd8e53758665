//! Analysis pipeline: verify, detect edges, synchronize, extract, aggregate.

use contracts::{AnalysisReport, AndroidEvent, RunInfo, Sample, ScenarioOperation, SyncGeometry};
use tracing::{info, instrument, warn};

use crate::clock::ClockSynchronizer;
use crate::edges::find_sync_edges;
use crate::error::{Result, SyncError};
use crate::interval::SampleIndex;
use crate::section::Section;

/// Offline energy analysis engine
///
/// Stateless between runs; one engine can analyze any number of captures
/// with the same fixture geometry.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    synchronizer: ClockSynchronizer,
}

impl SyncEngine {
    /// Create a new engine for the given sync fixture geometry
    pub fn new(geometry: SyncGeometry) -> Self {
        Self {
            synchronizer: ClockSynchronizer::new(geometry),
        }
    }

    pub fn geometry(&self) -> &SyncGeometry {
        self.synchronizer.geometry()
    }

    /// Check input sizes before any analysis
    ///
    /// The ANDROID log must hold exactly one entry per scenario operation
    /// plus the sync entries.
    pub fn verify_counts(
        &self,
        scenario_operations: usize,
        samples: usize,
        android_entries: usize,
    ) -> Result<()> {
        if scenario_operations == 0 {
            return Err(SyncError::EmptyScenario);
        }
        if samples == 0 {
            return Err(SyncError::EmptyRawTrace);
        }
        if android_entries == 0 {
            return Err(SyncError::EmptyAndroidLog);
        }

        let sync_entries = self.geometry().sync_log_entries();
        if scenario_operations + sync_entries != android_entries {
            return Err(SyncError::CountMismatch {
                scenario_operations,
                sync_entries,
                android_entries,
            });
        }
        Ok(())
    }

    /// Run the whole analysis on fully loaded inputs
    ///
    /// Produces one row per non-sync ANDROID event, in log order.
    #[instrument(
        name = "sync_engine_analyze",
        skip_all,
        fields(
            operations = scenario.len(),
            samples = samples.len(),
            events = events.len()
        )
    )]
    pub fn analyze(
        &self,
        scenario: &[ScenarioOperation],
        samples: &[Sample],
        events: &[AndroidEvent],
    ) -> Result<AnalysisReport> {
        self.verify_counts(scenario.len(), samples.len(), events.len())?;

        // 1. Edges
        let edges = find_sync_edges(samples)?;
        let expected = self.geometry().total_edges();
        if edges.rising.len() != expected || edges.falling.len() != expected {
            warn!(
                rising = edges.rising.len(),
                falling = edges.falling.len(),
                expected,
                "Unexpected number of sync edges"
            );
            observability::record_edge_mismatch(edges.rising.len(), edges.falling.len(), expected);
        }

        // 2. Clock offset
        let mapping = self.synchronizer.synchronize(&edges.rising, events)?;
        observability::record_clock_sync(&mapping, &edges);

        // 3. Map, extract and aggregate
        let index = SampleIndex::new(samples);
        let sync_operation = self.geometry().sync_operation.as_str();
        let mut rows = Vec::with_capacity(scenario.len());
        let mut empty_sections = 0;

        for event in events.iter().filter(|event| !event.is_sync(sync_operation)) {
            let start = mapping.to_raw(event.start_ts);
            let end = mapping.to_raw(event.end_ts);
            let entries = index.window(samples, start, end);
            let section = Section::new(entries, &event.operation, &event.debug);

            if section.is_empty() {
                empty_sections += 1;
                warn!(
                    operation = %event.operation,
                    start,
                    end,
                    "No RAW samples in operation window"
                );
            }

            let row = section.to_row();
            observability::record_section(&row);
            rows.push(row);
        }

        let info = RunInfo {
            clock_offset: mapping.to_raw(0.0),
            clock_offset_stdev: mapping.dispersion,
            sync_pairs: mapping.pairs,
            rising_edges: edges.rising.len(),
            falling_edges: edges.falling.len(),
            sections: rows.len(),
            empty_sections,
        };
        observability::record_run(&info);

        info!(
            clock_offset = info.clock_offset,
            clock_offset_stdev = info.clock_offset_stdev,
            sections = info.sections,
            empty_sections = info.empty_sections,
            "Analysis complete"
        );

        Ok(AnalysisReport { info, rows })
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(SyncGeometry::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::PinState;

    const OFFSET: f64 = 100.0;

    /// 0.1s samples over 6s with 8 two-sample pulses starting at 0.5s.
    /// Power equals the sample index.
    fn capture() -> Vec<Sample> {
        (0..=60)
            .map(|i| {
                let high = (5..=35).contains(&i) && (i - 5) % 4 < 2;
                let pin = if high { PinState::High } else { PinState::Low };
                Sample::new(f64::from(i) / 10.0, i64::from(i), pin)
            })
            .collect()
    }

    fn event(operation: &str, start_ts: f64, end_ts: f64) -> AndroidEvent {
        AndroidEvent {
            scenario: "demo".into(),
            operation: operation.into(),
            start_ts,
            end_ts,
            debug: format!("op={operation}"),
        }
    }

    /// Sync rows for the rising edges, then for the falling edges, then the operations
    fn android_log(operations: &[(&str, f64, f64)]) -> Vec<AndroidEvent> {
        let mut events: Vec<AndroidEvent> = (0..8)
            .map(|k| {
                let rise = 0.5 + 0.4 * f64::from(k) + OFFSET;
                event("sync", rise, rise + 0.01)
            })
            .collect();
        events.extend((0..8).map(|k| {
            let fall = 0.7 + 0.4 * f64::from(k) + OFFSET;
            event("sync", fall, fall + 0.01)
        }));
        events.extend(
            operations
                .iter()
                .map(|&(name, start, end)| event(name, start + OFFSET, end + OFFSET)),
        );
        events
    }

    fn scenario(n: usize) -> Vec<ScenarioOperation> {
        vec![
            ScenarioOperation {
                name: "op".into(),
                op_name: "Op".into(),
                params: Default::default(),
            };
            n
        ]
    }

    #[test]
    fn capture_fixture_has_expected_edges() {
        let edges = find_sync_edges(&capture()).unwrap();
        assert_eq!(edges.rising.len(), 8);
        assert_eq!(edges.falling.len(), 8);
    }

    #[test]
    fn analyzes_synthetic_capture() {
        let events = android_log(&[("idle", 3.95, 4.45), ("hash", 4.95, 5.35)]);
        let report = SyncEngine::default()
            .analyze(&scenario(2), &capture(), &events)
            .unwrap();

        assert!((report.info.clock_offset + OFFSET).abs() < 1e-9);
        assert!(report.info.clock_offset_stdev < 1e-9);
        assert_eq!(report.info.sync_pairs, 8);
        assert_eq!(report.info.sections, 2);
        assert_eq!(report.info.empty_sections, 0);

        // samples 40..=44
        let idle = &report.rows[0];
        assert_eq!(idle.name, "idle");
        assert!((idle.start - 4.0).abs() < 1e-9);
        assert!((idle.end - 4.4).abs() < 1e-9);
        assert!((idle.power_avg - 42.0).abs() < 1e-9);
        assert!((idle.energy - 42.0 * 0.4).abs() < 1e-9);
        assert_eq!(idle.debug, "op=idle");

        // samples 50..=53
        let hash = &report.rows[1];
        assert_eq!(hash.name, "hash");
        assert!((hash.power_avg - 51.5).abs() < 1e-9);
    }

    #[test]
    fn window_outside_capture_gives_zero_row() {
        let events = android_log(&[("late", 10.0, 11.0)]);
        let report = SyncEngine::default()
            .analyze(&scenario(1), &capture(), &events)
            .unwrap();

        assert_eq!(report.info.empty_sections, 1);
        assert!(report.rows[0].empty);
        assert_eq!(report.rows[0].name, "late");
    }

    #[test]
    fn sync_rows_are_not_sections() {
        let events = android_log(&[("a", 3.95, 4.15), ("b", 4.15, 4.35), ("c", 4.35, 4.55)]);
        let report = SyncEngine::default()
            .analyze(&scenario(3), &capture(), &events)
            .unwrap();
        let names: Vec<&str> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn count_gate() {
        let engine = SyncEngine::default();
        assert_eq!(engine.verify_counts(3, 10, 19), Ok(()));
        assert_eq!(engine.verify_counts(0, 10, 16), Err(SyncError::EmptyScenario));
        assert_eq!(engine.verify_counts(3, 0, 19), Err(SyncError::EmptyRawTrace));
        assert_eq!(engine.verify_counts(3, 10, 0), Err(SyncError::EmptyAndroidLog));

        for android_entries in [18, 20, 3, 100] {
            assert_eq!(
                engine.verify_counts(3, 10, android_entries),
                Err(SyncError::CountMismatch {
                    scenario_operations: 3,
                    sync_entries: 16,
                    android_entries,
                })
            );
        }
    }

    #[test]
    fn count_gate_follows_geometry() {
        let engine = SyncEngine::new(SyncGeometry {
            log_entries_per_pulse: 1,
            ..Default::default()
        });
        assert_eq!(engine.verify_counts(2, 1, 10), Ok(()));
    }

    #[test]
    fn mismatch_aborts_before_analysis() {
        let events = android_log(&[("idle", 4.0, 4.5)]);
        let err = SyncEngine::default()
            .analyze(&scenario(2), &capture(), &events)
            .unwrap_err();
        assert!(matches!(err, SyncError::CountMismatch { .. }));
    }

    #[test]
    fn missing_sync_pattern_is_fatal() {
        let flat: Vec<Sample> = capture()
            .into_iter()
            .map(|s| Sample::new(s.time, s.power, PinState::Low))
            .collect();
        let events = android_log(&[("idle", 4.0, 4.5)]);
        let err = SyncEngine::default()
            .analyze(&scenario(1), &flat, &events)
            .unwrap_err();
        assert_eq!(
            err,
            SyncError::InsufficientSyncPairs {
                available: 0,
                required: 2
            }
        );
    }

    #[test]
    fn partial_sync_pattern_still_analyzes() {
        // drop the last four pulses
        let samples: Vec<Sample> = capture()
            .into_iter()
            .map(|s| {
                if s.time > 2.05 {
                    Sample::new(s.time, s.power, PinState::Low)
                } else {
                    s
                }
            })
            .collect();
        let events = android_log(&[("idle", 4.0, 4.5)]);
        let report = SyncEngine::default()
            .analyze(&scenario(1), &samples, &events)
            .unwrap();
        assert_eq!(report.info.rising_edges, 4);
        assert_eq!(report.info.sync_pairs, 4);
        assert!((report.info.clock_offset + OFFSET).abs() < 1e-9);
    }
}
