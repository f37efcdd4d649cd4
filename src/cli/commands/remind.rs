//! Remind command - Nudge a prospect waiting on the KYC form or onboarding

use std::path::Path;

use crate::email::ReminderKind;
use crate::errors::Result;

use super::{open_pipeline, print_outcome};

pub async fn run(cwd: Option<&Path>, id: &str, kind: ReminderKind, json: bool) -> Result<()> {
    let pipeline = open_pipeline(cwd)?;
    let outcome = pipeline.send_reminder(id, kind).await?;
    print_outcome(&outcome, json)
}
