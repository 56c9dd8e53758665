//! 配置校验模块
//!
//! 校验规则：
//! - 字段范围 (sync_blocks >= 1, edges_per_block >= 2, log_entries_per_pulse >= 1)
//! - 文件后缀非空且互不相同
//! - raw_suffix 必须以 .csv 结尾
//! - sink 名称非空且唯一

use std::collections::HashSet;

use contracts::{AnalysisConfig, ContractError};
use validator::Validate;

/// 校验 AnalysisConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &AnalysisConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_suffixes(config)?;
    validate_sinks(config)?;
    Ok(())
}

/// 字段级校验 (derive 规则)
fn validate_fields(config: &AnalysisConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("config", e.to_string()))
}

/// 校验文件后缀
fn validate_suffixes(config: &AnalysisConfig) -> Result<(), ContractError> {
    let files = &config.files;

    if !files.raw_suffix.ends_with(".csv") {
        return Err(ContractError::config_validation(
            "files.raw_suffix",
            format!("raw_suffix must end with .csv, got '{}'", files.raw_suffix),
        ));
    }

    let suffixes = [
        ("files.raw_suffix", &files.raw_suffix),
        ("files.android_suffix", &files.android_suffix),
        ("files.sections_suffix", &files.sections_suffix),
        ("files.info_suffix", &files.info_suffix),
    ];
    let mut seen = HashSet::new();
    for (field, suffix) in suffixes {
        if !seen.insert(suffix.as_str()) {
            return Err(ContractError::config_validation(
                field,
                format!("duplicate suffix '{suffix}'"),
            ));
        }
    }
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(config: &AnalysisConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in config.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(&sink.name) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.queue_capacity == 0 {
            return Err(ContractError::config_validation(
                format!("sinks[{}].queue_capacity", idx),
                "queue_capacity must be > 0",
            ));
        }
    }
    Ok(())
}
