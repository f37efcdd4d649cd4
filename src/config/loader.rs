//! Configuration loading with defaults

use std::path::Path;

use crate::errors::{PipelineError, Result};
use crate::fs;
use crate::schemas::PipelineConfig;

/// Load configuration from the data root, falling back to defaults.
///
/// Fields missing from config.json take their defaults. The result is
/// validated before it is returned.
pub fn load_config(root: &Path) -> Result<PipelineConfig> {
    let config = fs::read_config(root)?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject settings that would produce broken emails or records
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    if config.fund_id.trim().is_empty() {
        return Err(PipelineError::ConfigError("fund_id must not be empty".to_string()));
    }
    for (field, url) in [("portal_url", &config.portal_url), ("meeting_url", &config.meeting_url)] {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(PipelineError::ConfigError(format!(
                "{} must be an http(s) URL, got {:?}",
                field, url
            )));
        }
    }
    for (field, address) in [
        ("sender_email", &config.sender_email),
        ("support_email", &config.support_email),
    ] {
        if !address.contains('@') {
            return Err(PipelineError::ConfigError(format!(
                "{} is not an email address: {:?}",
                field, address
            )));
        }
    }
    Ok(())
}
