//! Sink implementations
//!
//! Contains LogSink, SectionsCsvSink, and InfoJsonSink.

mod info;
mod log;
mod sections;

use std::path::Path;

use contracts::ContractError;

pub use self::info::InfoJsonSink;
pub use self::log::LogSink;
pub use self::sections::{format_sections_csv, SectionsCsvSink, SECTIONS_HEADER};

/// Write a whole output file, creating its directory first
async fn write_output(sink_name: &str, path: &Path, content: String) -> Result<(), ContractError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ContractError::sink_write(sink_name, format!("{}: {e}", parent.display()))
        })?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ContractError::sink_write(sink_name, format!("{}: {e}", path.display())))
}
