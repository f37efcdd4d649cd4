//! JSON file operations with schema validation
//!
//! Provides functions to read and write JSON files with serde validation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{PipelineError, Result};
use crate::schemas::{Investor, PipelineConfig, Prospect};

use super::paths::{get_config_path, get_investor_path, get_prospect_path};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file does not parse into `T`
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            PipelineError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        PipelineError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Writes to a temp file and renames it over the target so readers never see
/// a partial record.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| PipelineError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// List the `.json` files of a directory, sorted by name.
///
/// A missing directory is treated as empty.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read the config.json file, or defaults if it doesn't exist
pub fn read_config(root: &Path) -> Result<PipelineConfig> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }
    read_json(&path)
}

pub fn read_prospect(root: &Path, id: &str) -> Result<Prospect> {
    read_json(&get_prospect_path(root, id))
}

pub fn write_prospect(root: &Path, prospect: &Prospect) -> Result<()> {
    write_json(&get_prospect_path(root, &prospect.id), prospect)
}

pub fn read_investor(root: &Path, id: &str) -> Result<Investor> {
    read_json(&get_investor_path(root, id))
}

pub fn write_investor(root: &Path, investor: &Investor) -> Result<()> {
    write_json(&get_investor_path(root, &investor.id), investor)
}
