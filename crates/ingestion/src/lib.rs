//! # Ingestion
//!
//! Trace Reader module.
//!
//! Responsibilities:
//! - Parse the RAW power trace csv into `Sample`s
//! - Parse the ANDROID execution log into `AndroidEvent`s
//! - Parse scenario files into `ScenarioOperation`s
//! - Locate measurement files and derive output paths
//! - Generate synthetic captures for tests and demos
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{load_inputs, InputPaths};
//!
//! let inputs = load_inputs(&InputPaths {
//!     scenario: "scenarios/idle.scenario".into(),
//!     raw: "measurements/idle_20240301_0800_raw.csv".into(),
//!     android: "measurements/idle_20240301_0800_android.csv".into(),
//! })
//! .await?;
//! println!("{} samples", inputs.samples.len());
//! ```

mod android;
mod discovery;
mod error;
mod loader;
mod raw;
mod scenario;
mod synthetic;

// Re-exports
pub use android::{format_android_log, parse_android_log, ANDROID_HEADER};
pub use discovery::{
    basename_from_scenario_path, derive_output_path, measurement_filename, most_recent_file,
    STAMP_FORMAT,
};
pub use error::{IngestionError, Result};
pub use loader::{load_inputs, InputPaths, RunInputs};
pub use raw::{format_raw_trace, parse_raw_trace, RAW_HEADER};
pub use scenario::parse_scenario;
pub use synthetic::{OperationWindow, SyntheticCapture, SyntheticConfig, SyntheticOperation};
