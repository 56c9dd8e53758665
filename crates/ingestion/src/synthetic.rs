//! 合成测量数据
//!
//! 无需功率计和设备即可生成一组一致的 scenario / RAW / ANDROID 输入，
//! 用于端到端测试和演示。

use std::path::Path;

use chrono::NaiveDateTime;
use contracts::{AndroidEvent, FileLayout, PinState, Sample, SyncGeometry};
use tracing::debug;

use crate::android::format_android_log;
use crate::discovery::measurement_filename;
use crate::error::{IngestionError, Result};
use crate::loader::InputPaths;
use crate::raw::format_raw_trace;

/// 合成操作
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticOperation {
    /// 操作名
    pub name: String,

    /// 持续时间 (秒)
    pub duration_s: f64,

    /// 操作期间的恒定功率 (mW)
    pub power_mw: i64,
}

impl SyntheticOperation {
    pub fn new(name: impl Into<String>, duration_s: f64, power_mw: i64) -> Self {
        Self {
            name: name.into(),
            duration_s,
            power_mw,
        }
    }
}

/// 合成采集配置
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// 场景名 (同时作为文件 basename)
    pub scenario: String,

    /// 同步脉冲几何
    pub geometry: SyncGeometry,

    /// RAW 采样间隔 (秒)
    pub sample_interval_s: f64,

    /// 设备时钟相对 RAW 时钟的偏移 (秒)
    pub clock_offset_s: f64,

    /// 单个同步脉冲高电平/低电平时长 (秒)
    pub pulse_width_s: f64,

    /// 首尾及同步段后的空闲时长 (秒)
    pub settle_s: f64,

    /// 相邻操作之间的间隔 (秒)
    pub pause_s: f64,

    /// 空闲功率 (mW)
    pub base_power_mw: i64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            scenario: "synthetic".to_string(),
            geometry: SyncGeometry::default(),
            sample_interval_s: 0.01,
            clock_offset_s: 1_000.0,
            pulse_width_s: 0.05,
            settle_s: 0.5,
            pause_s: 0.2,
            base_power_mw: 50,
        }
    }
}

/// RAW 时钟上的操作窗口 (生成时已知的真值)
#[derive(Debug, Clone, PartialEq)]
pub struct OperationWindow {
    pub name: String,
    /// 第一个采样时间
    pub first_sample: f64,
    /// 最后一个采样时间
    pub last_sample: f64,
    pub power_mw: i64,
}

impl OperationWindow {
    /// 期望能耗 (mJ)
    pub fn energy(&self) -> f64 {
        self.power_mw as f64 * (self.last_sample - self.first_sample)
    }
}

/// 一次合成采集
#[derive(Debug, Clone)]
pub struct SyntheticCapture {
    /// scenario 文件内容
    pub scenario_file: String,

    /// RAW 采样
    pub samples: Vec<Sample>,

    /// ANDROID 日志 (同步行在前)
    pub events: Vec<AndroidEvent>,

    /// 真值窗口，与 `operations` 一一对应
    pub windows: Vec<OperationWindow>,
}

impl SyntheticCapture {
    /// 生成采集数据
    ///
    /// 时间线：空闲 -> 同步脉冲串 -> 空闲 -> 各操作 (以 `pause_s` 分隔) -> 空闲。
    /// 所有边界都对齐到采样点；ANDROID 操作时间戳落在两个采样点中间。
    pub fn generate(config: &SyntheticConfig, operations: &[SyntheticOperation]) -> Self {
        let dt = config.sample_interval_s;
        let steps = |seconds: f64| ((seconds / dt).round() as usize).max(1);
        let time = |index: usize| index as f64 * dt;

        let settle = steps(config.settle_s);
        let width = steps(config.pulse_width_s);
        let pause = steps(config.pause_s);

        // 同步脉冲 [rise, fall)
        let pulses: Vec<(usize, usize)> = (0..config.geometry.total_edges())
            .map(|k| {
                let rise = settle + 2 * width * k;
                (rise, rise + width)
            })
            .collect();
        let sync_end = pulses.last().map_or(settle, |&(_, fall)| fall);

        // 操作 [start, end)
        let mut cursor = sync_end + settle;
        let spans: Vec<(usize, usize)> = operations
            .iter()
            .map(|op| {
                let span = (cursor, cursor + steps(op.duration_s));
                cursor = span.1 + pause;
                span
            })
            .collect();
        let total = cursor + settle;

        let samples: Vec<Sample> = (0..total)
            .map(|i| {
                let high = pulses.iter().any(|&(rise, fall)| (rise..fall).contains(&i));
                let power = spans
                    .iter()
                    .zip(operations)
                    .find(|((start, end), _)| (*start..*end).contains(&i))
                    .map_or(config.base_power_mw, |(_, op)| op.power_mw);
                let pin = if high { PinState::High } else { PinState::Low };
                Sample::new(time(i), power, pin)
            })
            .collect();

        let device = |raw_time: f64| raw_time + config.clock_offset_s;
        let event = |operation: &str, start_ts: f64, end_ts: f64, debug: String| AndroidEvent {
            scenario: config.scenario.clone(),
            operation: operation.to_string(),
            start_ts,
            end_ts,
            debug,
        };

        // 第一轮同步行对应上升沿，之后各轮对应下降沿
        let mut events = Vec::with_capacity(config.geometry.sync_log_entries() + operations.len());
        for round in 0..config.geometry.log_entries_per_pulse {
            for &(rise, fall) in &pulses {
                let (edge, at) = if round == 0 {
                    ("rising", rise)
                } else {
                    ("falling", fall)
                };
                events.push(event(
                    &config.geometry.sync_operation,
                    device(time(at)),
                    device(time(at)) + dt,
                    format!("edge={edge}"),
                ));
            }
        }

        let half = dt / 2.0;
        for (i, (op, &(start, end))) in operations.iter().zip(&spans).enumerate() {
            events.push(event(
                &op.name,
                device(time(start) - half),
                device(time(end) - half),
                format!("iteration={i}"),
            ));
        }

        let windows = operations
            .iter()
            .zip(&spans)
            .map(|(op, &(start, end))| OperationWindow {
                name: op.name.clone(),
                first_sample: time(start),
                last_sample: time(end - 1),
                power_mw: op.power_mw,
            })
            .collect();

        let scenario_file = operations
            .iter()
            .map(|op| format!("1;{};{};duration={}\n", op.name, op.name, op.duration_s))
            .collect();

        debug!(
            samples = samples.len(),
            events = events.len(),
            operations = operations.len(),
            "Synthetic capture generated"
        );

        Self {
            scenario_file,
            samples,
            events,
            windows,
        }
    }

    /// 按测量目录约定写出三个输入文件
    pub async fn write_to(
        &self,
        dir: &Path,
        scenario: &str,
        at: NaiveDateTime,
        layout: &FileLayout,
    ) -> Result<InputPaths> {
        let paths = InputPaths {
            scenario: dir.join(format!("{scenario}{}", layout.scenario_extension)),
            raw: dir.join(measurement_filename(scenario, at, &layout.raw_suffix)),
            android: dir.join(measurement_filename(scenario, at, &layout.android_suffix)),
        };

        tokio::try_join!(
            write_file(&paths.scenario, self.scenario_file.clone()),
            write_file(&paths.raw, format_raw_trace(&self.samples)),
            write_file(&paths.android, format_android_log(&self.events)),
        )?;

        Ok(paths)
    }
}

async fn write_file(path: &Path, content: String) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| IngestionError::Write {
            path: path.display().to_string(),
            source,
        })
}
