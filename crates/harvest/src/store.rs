// ABOUTME: JSON persistence helpers for corpus files, reports and Q&A output.
// ABOUTME: Also derives the temp-file and verification-report paths that sit beside an output file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{HarvestError, Result};

const TEMP_PREFIX: &str = "temp_";
const REPORT_SUFFIX: &str = "_verification_report.json";

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let target = path.display().to_string();
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| HarvestError::json(&target, "SaveJson", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarvestError::io(&target, "SaveJson", e))?;
    }
    fs::write(path, body).map_err(|e| HarvestError::io(&target, "SaveJson", e))
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let target = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|e| HarvestError::io(&target, "LoadJson", e))?;
    serde_json::from_str(&raw).map_err(|e| HarvestError::json(&target, "LoadJson", e))
}

/// Write plain text (used for the Markdown export).
pub fn save_text(path: &Path, text: &str) -> Result<()> {
    let target = path.display().to_string();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HarvestError::io(&target, "SaveText", e))?;
    }
    fs::write(path, text).map_err(|e| HarvestError::io(&target, "SaveText", e))
}

/// `dir/name.json` becomes `dir/temp_name.json`.
pub fn temp_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}{}", TEMP_PREFIX, name))
}

/// `dir/name.json` becomes `dir/name_verification_report.json`.
pub fn report_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{}{}", stem, REPORT_SUFFIX))
}

/// Remove a file if it exists; missing files are not an error.
pub fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(HarvestError::io(path.display().to_string(), "Remove", e)),
    }
}
