//! Scenario file parser.
//!
//! Each non-comment line is either
//! `iterations;name;op_name;params` (legacy) or
//! `iterations;pause;name;op_name;params`, where `params` is `k=v,k=v` or empty.
//! A line expands to `iterations` operations.

use std::collections::BTreeMap;

use contracts::ScenarioOperation;
use tracing::debug;

use crate::error::{IngestionError, Result};

const SOURCE: &str = "scenario";

/// Parse a scenario file into its flat list of operations
pub fn parse_scenario(content: &str) -> Result<Vec<ScenarioOperation>> {
    let mut operations = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split(';').collect();
        let (iterations, name, op_name, params) = match parts.as_slice() {
            [iterations, name, op_name, params] => (*iterations, *name, *op_name, *params),
            [iterations, _pause, name, op_name, params] => (*iterations, *name, *op_name, *params),
            _ => {
                return Err(IngestionError::parse(
                    SOURCE,
                    line_no,
                    format!("cannot split line: {line}"),
                ))
            }
        };

        let iterations: usize = iterations.trim().parse().map_err(|e| {
            IngestionError::parse(SOURCE, line_no, format!("bad iterations '{iterations}': {e}"))
        })?;
        let params = parse_params(params, line_no)?;

        let operation = ScenarioOperation {
            name: name.trim().to_string(),
            op_name: op_name.trim().to_string(),
            params,
        };
        operations.extend(std::iter::repeat_n(operation, iterations));
    }

    debug!(operations = operations.len(), "Scenario parsed");
    Ok(operations)
}

fn parse_params(params: &str, line_no: usize) -> Result<BTreeMap<String, String>> {
    let params = params.trim();
    if params.is_empty() {
        return Ok(BTreeMap::new());
    }

    params
        .split(',')
        .map(|pair| {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                IngestionError::parse(SOURCE, line_no, format!("param '{pair}' is not k=v"))
            })?;
            Ok((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
