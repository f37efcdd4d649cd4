//! Advance and disqualify commands

use std::path::Path;

use crate::errors::Result;

use super::{open_pipeline, print_outcome};

/// Move the prospect to its single next status
pub async fn run(cwd: Option<&Path>, id: &str, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.advance(id).await?;
    print_outcome(&outcome, json)
}

/// Mark the prospect not eligible; no email is sent
pub async fn run_disqualify(
    cwd: Option<&Path>,
    id: &str,
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.disqualify(id, notes).await?;
    print_outcome(&outcome, json)
}
