//! 分析指标收集模块
//!
//! 基于 ClockMapping / SectionRow 收集和统计一次分析运行的指标。

use std::collections::BTreeMap;

use contracts::{ClockMapping, RunInfo, SectionRow, SyncEdges};
use metrics::{counter, gauge, histogram};

/// 记录时钟同步结果
///
/// 每次运行计算出 ClockMapping 后调用。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_clock_sync;
///
/// let mapping = synchronizer.synchronize(&edges.rising, &events)?;
/// record_clock_sync(&mapping, &edges);
/// ```
pub fn record_clock_sync(mapping: &ClockMapping, edges: &SyncEdges) {
    gauge!("energy_sync_clock_offset_s").set(mapping.offset);
    gauge!("energy_sync_clock_dispersion_s").set(mapping.dispersion);
    gauge!("energy_sync_sync_pairs").set(mapping.pairs as f64);

    // 边沿计数
    gauge!("energy_sync_edges", "direction" => "rising").set(edges.rising.len() as f64);
    gauge!("energy_sync_edges", "direction" => "falling").set(edges.falling.len() as f64);
}

/// 记录边沿数量与预期不符
pub fn record_edge_mismatch(rising: usize, falling: usize, expected: usize) {
    counter!("energy_sync_edge_mismatch_total").increment(1);
    gauge!("energy_sync_edges_expected").set(expected as f64);
    gauge!("energy_sync_edges_missing").set(
        (expected.saturating_sub(rising) + expected.saturating_sub(falling)) as f64,
    );
}

/// 记录单个区段
pub fn record_section(row: &SectionRow) {
    if row.empty {
        counter!("energy_sync_sections_total", "status" => "empty").increment(1);
        return;
    }

    counter!("energy_sync_sections_total", "status" => "ok").increment(1);
    histogram!("energy_sync_section_duration_s").record(row.end - row.start);
    histogram!("energy_sync_section_power_mw").record(row.power_avg);
    histogram!(
        "energy_sync_section_energy_mj",
        "operation" => row.name.clone()
    )
    .record(row.energy);
}

/// 记录整次运行
pub fn record_run(info: &RunInfo) {
    counter!("energy_sync_runs_total").increment(1);
    gauge!("energy_sync_last_run_sections").set(info.sections as f64);
    gauge!("energy_sync_last_run_empty_sections").set(info.empty_sections as f64);
}

/// 区段指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct SectionMetricsAggregator {
    /// 区段总数
    pub total_sections: u64,

    /// 空区段数
    pub empty_sections: u64,

    /// 时长统计 (秒)
    pub duration_stats: RunningStats,

    /// 平均功率统计 (mW)
    pub power_stats: RunningStats,

    /// 各操作能耗统计 (mJ)
    pub energy_stats: BTreeMap<String, RunningStats>,
}

impl SectionMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, row: &SectionRow) {
        self.total_sections += 1;
        if row.empty {
            self.empty_sections += 1;
            return;
        }

        self.duration_stats.push(row.end - row.start);
        self.power_stats.push(row.power_avg);
        self.energy_stats
            .entry(row.name.clone())
            .or_default()
            .push(row.energy);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_sections: self.total_sections,
            empty_sections: self.empty_sections,
            empty_rate: if self.total_sections > 0 {
                self.empty_sections as f64 / self.total_sections as f64 * 100.0
            } else {
                0.0
            },
            duration_s: StatsSummary::from(&self.duration_stats),
            power_mw: StatsSummary::from(&self.power_stats),
            energy_mj: self
                .energy_stats
                .iter()
                .map(|(name, stats)| (name.clone(), StatsSummary::from(stats)))
                .collect(),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_sections: u64,
    pub empty_sections: u64,
    pub empty_rate: f64,
    pub duration_s: StatsSummary,
    pub power_mw: StatsSummary,
    pub energy_mj: BTreeMap<String, StatsSummary>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Section Metrics Summary ===")?;
        writeln!(f, "Total sections: {}", self.total_sections)?;
        writeln!(
            f,
            "Empty sections: {} ({:.2}%)",
            self.empty_sections, self.empty_rate
        )?;
        writeln!(f, "Duration (s): {}", self.duration_s)?;
        writeln!(f, "Power (mW): {}", self.power_mw)?;

        if !self.energy_mj.is_empty() {
            writeln!(f, "Energy per operation (mJ):")?;
            for (name, stats) in &self.energy_mj {
                writeln!(f, "  {}: {}", name, stats)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差 (n - 1)
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}
