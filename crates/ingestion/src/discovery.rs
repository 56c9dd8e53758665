//! Measurement file naming and discovery.
//!
//! Files are named `<basename>_<YYYYMMDD_HHMM><suffix>`, so lexicographic order
//! is chronological order.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{IngestionError, Result};

/// Timestamp layout embedded in measurement file names
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Strip directories and the scenario extension
pub fn basename_from_scenario_path(path: &Path, scenario_extension: &str) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name.replace(scenario_extension, "")
}

/// `<basename>_<stamp><suffix>` for a given capture time
pub fn measurement_filename(basename: &str, at: NaiveDateTime, suffix: &str) -> String {
    format!("{basename}_{}{suffix}", at.format(STAMP_FORMAT))
}

/// Most recent file in `dir` for `prefix` ending in `suffix`
///
/// Only names starting with `<prefix>_20` are considered.
pub fn most_recent_file(dir: &Path, prefix: &str, suffix: &str) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestionError::Read {
        path: dir.display().to_string(),
        source,
    })?;

    let wanted_prefix = format!("{prefix}_20");
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&wanted_prefix) && name.ends_with(suffix))
        .collect();
    names.sort();

    Ok(names.pop().map(|name| dir.join(name)))
}

/// Replace `from_suffix` in a measurement path with `to_suffix`
///
/// Returns `None` when the path does not end in `from_suffix`.
pub fn derive_output_path(raw_path: &Path, from_suffix: &str, to_suffix: &str) -> Option<PathBuf> {
    let file_name = raw_path.file_name()?.to_str()?;
    let stem = file_name.strip_suffix(from_suffix)?;
    Some(raw_path.with_file_name(format!("{stem}{to_suffix}")))
}
