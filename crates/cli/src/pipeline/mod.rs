//! Pipeline orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{Pipeline, RunPlan};
pub use stats::PipelineStats;
