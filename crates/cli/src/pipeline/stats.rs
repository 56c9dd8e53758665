//! Pipeline statistics.

use std::time::Duration;

use contracts::RunInfo;
use dispatcher::MetricsSnapshot;
use observability::SectionMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Wall time of load, analysis and output
    pub duration: Duration,

    /// Scenario operations
    pub operations: usize,

    /// RAW samples
    pub samples: usize,

    /// ANDROID log entries, sync rows included
    pub events: usize,

    /// Number of sinks that received the report
    pub active_sinks: usize,

    /// Run metadata as written to the info file
    pub info: RunInfo,

    /// Per-section statistics
    pub section_metrics: SectionMetricsAggregator,

    /// Per-sink write counters
    pub sinks: Vec<(String, MetricsSnapshot)>,
}

impl PipelineStats {
    /// Energy summed over all non-empty sections (mJ)
    pub fn total_energy(&self) -> f64 {
        self.section_metrics
            .energy_stats
            .values()
            .map(|stats| stats.mean() * stats.count() as f64)
            .sum()
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== energy-sync run ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        println!("   ├─ Scenario operations: {}", self.operations);
        println!("   ├─ RAW samples: {}", self.samples);
        println!("   ├─ ANDROID entries: {}", self.events);
        println!("   └─ Active sinks: {}", self.active_sinks);

        println!("\nClock");
        println!("   ├─ Offset (RAW at ANDROID t=0): {:.4}s", self.info.clock_offset);
        println!("   ├─ Stdev: {:.4}s", self.info.clock_offset_stdev);
        println!("   ├─ Sync pairs: {}", self.info.sync_pairs);
        println!(
            "   └─ Edges: {} rising, {} falling",
            self.info.rising_edges, self.info.falling_edges
        );

        println!("\nSections");
        println!("   ├─ Total energy: {:.4} mJ", self.total_energy());
        print!("{}", indent(&self.section_metrics.summary().to_string()));

        if !self.sinks.is_empty() {
            println!("\nSinks");
            for (name, snapshot) in &self.sinks {
                println!(
                    "   ├─ {}: {} written, {} failed",
                    name, snapshot.write_count, snapshot.failure_count
                );
            }
        }

        println!();
    }
}

fn indent(text: &str) -> String {
    text.lines().map(|line| format!("   │  {line}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SectionRow;

    #[test]
    fn total_energy_sums_sections() {
        let mut stats = PipelineStats::default();
        for (name, energy) in [("a", 10.0), ("a", 20.0), ("b", 5.0)] {
            let row = SectionRow {
                start: 0.0,
                end: 1.0,
                name: name.to_string(),
                power_avg: energy,
                energy,
                debug: String::new(),
                empty: false,
            };
            stats.section_metrics.update(&row);
        }
        stats.section_metrics.update(&SectionRow::empty("c"));

        assert!((stats.total_energy() - 35.0).abs() < 1e-9);
    }
}
