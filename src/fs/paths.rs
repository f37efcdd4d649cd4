//! Path resolution utilities for the pipeline data directory
//!
//! All state lives under a `.prospects` directory:
//! `config.json`, `prospects/<id>.json`, `investors/<id>.json` and `outbox/`.

use std::path::{Path, PathBuf};

use crate::errors::{PipelineError, Result};

const DATA_DIR: &str = ".prospects";

/// Find the directory containing `.prospects`.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `ConfigError` - If no data directory is found (run `init` first)
pub fn find_data_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| PipelineError::ConfigError(format!("Cannot resolve path: {}", e)))?;

    loop {
        if current.join(DATA_DIR).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(PipelineError::ConfigError(format!(
                    "Could not find a {} directory; run `init` first",
                    DATA_DIR
                )));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub fn get_data_dir(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

pub fn get_config_path(root: &Path) -> PathBuf {
    get_data_dir(root).join("config.json")
}

pub fn get_prospects_dir(root: &Path) -> PathBuf {
    get_data_dir(root).join("prospects")
}

pub fn get_prospect_path(root: &Path, id: &str) -> PathBuf {
    get_prospects_dir(root).join(format!("{}.json", id))
}

pub fn get_investors_dir(root: &Path) -> PathBuf {
    get_data_dir(root).join("investors")
}

pub fn get_investor_path(root: &Path, id: &str) -> PathBuf {
    get_investors_dir(root).join(format!("{}.json", id))
}

/// Where the outbox email service drops messages
pub fn get_outbox_dir(root: &Path) -> PathBuf {
    get_data_dir(root).join("outbox")
}
