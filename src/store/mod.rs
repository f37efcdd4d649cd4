//! Prospect persistence
//!
//! Writes are optimistic: every status change names the status and version it
//! was computed from, and the store refuses it if the stored record moved on,
//! even when the status has since come back to the same value.
//! The email log is append-only and owned by [`ProspectStore::record_email`];
//! status writes never overwrite it and appending does not bump the version.

mod json;
mod memory;

use async_trait::async_trait;

use crate::errors::{PipelineError, Result};
use crate::schemas::{EmailLogEntry, Investor, InvestorDraft, Prospect, ProspectStatus};

pub use json::JsonProspectStore;
pub use memory::InMemoryProspectStore;

#[async_trait]
pub trait ProspectStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Prospect>>;

    /// Lookup by normalized email within one fund
    async fn find_by_email(&self, email: &str, fund_id: &str) -> Result<Option<Prospect>>;

    /// All prospects, optionally restricted to one fund, oldest first
    async fn list(&self, fund_id: Option<&str>) -> Result<Vec<Prospect>>;

    /// Store a new prospect; fails with `DuplicateProspect` if the email is taken in the fund
    async fn insert(&self, prospect: &Prospect) -> Result<()>;

    /// Replace the prospect if the stored record is still at `expected` and at
    /// `prospect.version`. Returns the committed record, with the stored email
    /// log and the next version.
    ///
    /// Fails with `ConcurrentModification` otherwise, writing nothing.
    async fn update_status(&self, prospect: &Prospect, expected: ProspectStatus)
        -> Result<Prospect>;

    /// Persist the investor and the converted prospect as one unit.
    ///
    /// The stored prospect must still be docusign_signed at `converted.version`;
    /// otherwise nothing is written and `ConcurrentModification` is returned.
    async fn create_investor_from_prospect(
        &self,
        draft: &InvestorDraft,
        converted: &Prospect,
    ) -> Result<Investor>;

    /// Append a delivered email to the prospect's log and return the updated record
    async fn record_email(&self, prospect_id: &str, entry: EmailLogEntry) -> Result<Prospect>;

    async fn find_investor(&self, id: &str) -> Result<Option<Investor>>;
}

/// Compare-and-swap check shared by the stores
fn check_expected(stored: &Prospect, expected: ProspectStatus, read_version: u64) -> Result<()> {
    if stored.status != expected || stored.version != read_version {
        return Err(PipelineError::ConcurrentModification {
            id: stored.id.clone(),
            expected,
            actual: stored.status,
            expected_version: read_version,
            actual_version: stored.version,
        });
    }
    Ok(())
}

/// The record a successful write stores: caller's state, stored email log, next version
fn committed(stored: &Prospect, next: &Prospect) -> Prospect {
    let mut record = next.clone();
    record.email_log = stored.email_log.clone();
    record.version = stored.version + 1;
    record
}

fn not_found(id: &str) -> PipelineError {
    PipelineError::NotFound(format!("prospect {}", id))
}

fn check_conversion(draft: &InvestorDraft, converted: &Prospect) -> Result<()> {
    if converted.status != ProspectStatus::Converted
        || converted.investor_id.as_deref() != Some(draft.id.as_str())
        || converted.id != draft.prospect_id
    {
        return Err(PipelineError::Validation(format!(
            "prospect {} is not a conversion of investor {}",
            converted.id, draft.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod contract_tests;
