//! CLI command implementations

pub mod advance;
pub mod convert;
pub mod documents;
pub mod init;
pub mod invite;
pub mod kyc;
pub mod list;
pub mod remind;
pub mod show;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::load_config;
use crate::email::OutboxEmailService;
use crate::errors::{PipelineError, Result};
use crate::fs::{find_data_root, get_outbox_dir, resolve_cwd};
use crate::pipeline::{EmailDelivery, Pipeline, TransitionOutcome};
use crate::store::JsonProspectStore;

/// Build a pipeline over the JSON store found from `cwd`.
///
/// Emails land in the `.prospects/outbox` directory.
pub fn open_pipeline(cwd: Option<&Path>) -> Result<Pipeline> {
    let root = find_data_root(&resolve_cwd(cwd))?;
    let config = load_config(&root)?;
    let store = Arc::new(JsonProspectStore::new(&root));
    let email = Arc::new(OutboxEmailService::new(get_outbox_dir(&root)));
    Ok(Pipeline::new(store, email, config))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| PipelineError::InvalidJson(e.to_string()))?;
    println!("{}", out);
    Ok(())
}

/// Print the result of a status change
pub(crate) fn print_outcome(outcome: &TransitionOutcome, json: bool) -> Result<()> {
    if json {
        return print_json(&outcome.prospect);
    }
    let prospect = &outcome.prospect;
    println!("{}  {}  {}", prospect.id, prospect.email, prospect.status);
    match &outcome.email {
        EmailDelivery::NotRequired => {}
        EmailDelivery::Sent(template) => println!("  email: {}", template),
        EmailDelivery::Failed { intent, error } => {
            eprintln!("  warning: {} email not delivered: {}", intent.template, error);
        }
    }
    Ok(())
}
