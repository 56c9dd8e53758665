//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace.
//! Business crates depend on this crate only, never on each other in reverse.
//!
//! ## Time Model
//! - RAW trace time: seconds (f64) on the power monitor clock
//! - ANDROID log time: seconds (f64) on the device monotonic clock
//! - The two are related by a single constant offset: `raw = android - offset`

mod analysis_config;
mod error;
mod event;
mod report;
mod sample;
mod sink;
mod sync;

pub use analysis_config::*;
pub use error::*;
pub use event::*;
pub use report::*;
pub use sample::*;
pub use sink::{LocalReportSink, ReportSink};
pub use sync::*;
