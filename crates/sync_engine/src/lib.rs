//! # Sync Engine
//!
//! 离线能耗分析核心（单线程、同步、全内存）。
//!
//! 负责：
//! - 同步引脚边沿检测
//! - ANDROID -> RAW 时钟偏移计算
//! - 操作时间窗映射与二分查找截取
//! - 区段功率/能耗聚合
//!
//! ## 使用示例
//!
//! ```ignore
//! use sync_engine::{SyncEngine, SyncGeometry};
//!
//! let engine = SyncEngine::new(SyncGeometry::default());
//! let report = engine.analyze(&scenario, &samples, &events)?;
//!
//! for row in &report.rows {
//!     println!("{}: {:.4} mJ", row.name, row.energy);
//! }
//! ```

mod clock;
mod edges;
mod engine;
mod error;
mod interval;
mod section;

pub use clock::{ClockSynchronizer, MIN_SYNC_PAIRS};
pub use edges::find_sync_edges;
pub use engine::SyncEngine;
pub use error::{Result, SyncError, TraceEnd};
pub use interval::{get_interval, SampleIndex};
pub use section::Section;

// Re-export contracts types
pub use contracts::{AnalysisReport, ClockMapping, RunInfo, SectionRow, SyncEdges, SyncGeometry};
