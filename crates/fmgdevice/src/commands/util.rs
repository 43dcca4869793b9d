//! Shared helpers for command handlers.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::{Map, Value};

use fmgdevice_core::{ResourceData, ResourceDef, resources};

use crate::error::CliError;

pub fn lookup(resource: &str) -> Result<&'static ResourceDef, CliError> {
    Ok(resources::require(resource)?)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag {
        return Ok(());
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false);
    if confirmed {
        Ok(())
    } else {
        Err(CliError::NotConfirmed {
            action: message.trim_end_matches('?').to_owned(),
        })
    }
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

pub fn read_state(path: &Path) -> Result<ResourceData, CliError> {
    Ok(ResourceData::from_json(read_json_file(path)?)?)
}

pub fn write_state(path: &Path, data: &ResourceData) -> Result<(), CliError> {
    let mut text = serde_json::to_string_pretty(data)?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}

/// Parse repeated `ATTR=VALUE` flags. Values that parse as JSON keep
/// their type (`entry=2` is a number), anything else is a string.
pub fn parse_assignments(pairs: &[String]) -> Result<Map<String, Value>, CliError> {
    let mut out = Map::new();
    for pair in pairs {
        let (attr, raw) = pair.split_once('=').ok_or_else(|| CliError::Validation {
            field: "--set".into(),
            reason: format!("expected ATTR=VALUE, got '{pair}'"),
        })?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
        out.insert(attr.trim().to_owned(), value);
    }
    Ok(out)
}

/// Human-readable state listing for table output.
pub fn state_detail(data: &ResourceData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id: {}", data.id().unwrap_or("(none)"));
    for (key, value) in data.attributes() {
        let _ = writeln!(out, "{key}: {value}");
    }
    out.trim_end().to_owned()
}
