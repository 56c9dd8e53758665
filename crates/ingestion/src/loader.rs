//! Loads the three inputs of one analysis run into memory.

use std::path::{Path, PathBuf};

use contracts::{AndroidEvent, Sample, ScenarioOperation};
use tracing::{info, instrument};

use crate::android::parse_android_log;
use crate::error::{IngestionError, Result};
use crate::raw::parse_raw_trace;
use crate::scenario::parse_scenario;

/// Input file locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub scenario: PathBuf,
    pub raw: PathBuf,
    pub android: PathBuf,
}

/// Fully materialized inputs handed to the sync engine
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub scenario: Vec<ScenarioOperation>,
    pub samples: Vec<Sample>,
    pub events: Vec<AndroidEvent>,
}

impl RunInputs {
    /// Parse already-read file contents
    pub fn from_contents(scenario: &str, raw: &str, android: &str) -> Result<Self> {
        Ok(Self {
            scenario: parse_scenario(scenario)?,
            samples: parse_raw_trace(raw)?,
            events: parse_android_log(android, None)?,
        })
    }
}

/// Read all three files concurrently, then parse them
#[instrument(
    name = "ingestion_load_inputs",
    skip(paths),
    fields(raw = %paths.raw.display(), android = %paths.android.display())
)]
pub async fn load_inputs(paths: &InputPaths) -> Result<RunInputs> {
    let (scenario, raw, android) = tokio::try_join!(
        read_file(&paths.scenario),
        read_file(&paths.raw),
        read_file(&paths.android),
    )?;

    let inputs = RunInputs::from_contents(&scenario, &raw, &android)?;
    info!(
        operations = inputs.scenario.len(),
        samples = inputs.samples.len(),
        events = inputs.events.len(),
        "Input files parsed"
    );
    Ok(inputs)
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| IngestionError::Read {
            path: path.display().to_string(),
            source,
        })
}
