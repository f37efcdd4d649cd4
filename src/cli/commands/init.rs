//! Init command - Create the pipeline data directory

use std::path::Path;

use tracing::info;

use crate::config::validate_config;
use crate::errors::{PipelineError, Result};
use crate::fs::{
    get_config_path, get_investors_dir, get_outbox_dir, get_prospects_dir, resolve_cwd, write_json,
};
use crate::schemas::PipelineConfig;

/// Create `.prospects/` with a default config.json
pub async fn run(
    cwd: Option<&Path>,
    force: bool,
    fund_id: Option<String>,
    fund_name: Option<String>,
) -> Result<()> {
    let root = resolve_cwd(cwd);
    let config_path = get_config_path(&root);
    if config_path.exists() && !force {
        return Err(PipelineError::ConfigError(format!(
            "{} already exists; use --force to overwrite",
            config_path.display()
        )));
    }

    let mut config = PipelineConfig::default();
    if let Some(fund_id) = fund_id {
        config.fund_id = fund_id;
    }
    if let Some(fund_name) = fund_name {
        config.fund_name = fund_name;
    }
    validate_config(&config)?;

    for dir in [
        get_prospects_dir(&root),
        get_investors_dir(&root),
        get_outbox_dir(&root),
    ] {
        std::fs::create_dir_all(dir)?;
    }
    write_json(&config_path, &config)?;

    info!(root = %root.display(), fund_id = %config.fund_id, "initialized");
    println!("Initialized {}", config_path.display());
    Ok(())
}
