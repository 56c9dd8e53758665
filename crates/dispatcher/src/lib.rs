//! # Dispatcher
//!
//! 分析结果分发模块。
//!
//! 负责：
//! - 消费 `AnalysisReport`
//! - Fan-out 到多个 sinks（区段 CSV、运行信息 JSON、日志）
//! - 隔离慢 sink，汇总写入失败

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod sinks;

pub use contracts::{AnalysisReport, ReportSink};
pub use dispatcher::{
    create_dispatcher, DispatchSummary, Dispatcher, DispatcherBuilder, DispatcherConfig,
    OutputPaths,
};
pub use error::DispatcherError;
pub use handle::SinkHandle;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{format_sections_csv, InfoJsonSink, LogSink, SectionsCsvSink, SECTIONS_HEADER};
