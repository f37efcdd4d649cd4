//! Document review workflow
//!
//! Documents move pending → approved or pending → rejected, never back. A
//! rejected set is replaced by new uploads, which open a new document cycle.

use chrono::{DateTime, Utc};

use crate::errors::{PipelineError, Result};
use crate::schemas::{Document, DocumentStatus, DocumentUpload, Prospect, ProspectStatus};

use super::transitions::{apply_transition, TransitionFields};
use super::validation::{normalize_reason, require_status};

/// Validate approving the current document set.
///
/// Requires documents_pending and at least one pending document.
pub fn can_approve_documents(prospect: &Prospect) -> Result<()> {
    require_status(prospect, ProspectStatus::DocumentsPending, "approve documents")?;
    if !prospect.has_pending_documents() {
        return Err(PipelineError::Validation(
            "no pending documents to approve".to_string(),
        ));
    }
    Ok(())
}

/// Approve every pending document and move to documents_approved
pub fn approve_documents(prospect: &Prospect, now: DateTime<Utc>) -> Result<Prospect> {
    can_approve_documents(prospect)?;
    apply_transition(
        prospect,
        ProspectStatus::DocumentsApproved,
        TransitionFields::default(),
        now,
    )
}

/// Reject every pending document and move to documents_rejected.
///
/// The reason is checked first, then the status; a failure leaves the prospect
/// untouched.
pub fn reject_documents(prospect: &Prospect, reason: &str, now: DateTime<Utc>) -> Result<Prospect> {
    let reason = normalize_reason(reason)?;
    require_status(prospect, ProspectStatus::DocumentsPending, "reject documents")?;
    apply_transition(
        prospect,
        ProspectStatus::DocumentsRejected,
        TransitionFields::default().with_rejection_reason(reason),
        now,
    )
}

/// Submit a new document set (first submission or re-submission after rejection)
pub fn submit_documents(
    prospect: &Prospect,
    uploads: Vec<(String, DocumentUpload)>,
    now: DateTime<Utc>,
) -> Result<Prospect> {
    apply_transition(
        prospect,
        ProspectStatus::DocumentsPending,
        TransitionFields::default().with_uploads(uploads),
        now,
    )
}

/// Append uploads as pending documents of the prospect's current cycle
pub(crate) fn append_uploads(
    prospect: &mut Prospect,
    uploads: Vec<(String, DocumentUpload)>,
    now: DateTime<Utc>,
) {
    let cycle = prospect.document_cycle;
    let prospect_id = prospect.id.clone();
    prospect
        .documents
        .extend(uploads.into_iter().map(|(id, upload)| Document {
            id,
            prospect_id: prospect_id.clone(),
            kind: upload.kind,
            file_name: upload.file_name,
            status: DocumentStatus::Pending,
            cycle,
            uploaded_at: now,
            reviewed_at: None,
            rejection_reason: None,
        }));
}

/// Close review of every pending document with the given outcome
pub(crate) fn review_pending(
    prospect: &mut Prospect,
    outcome: DocumentStatus,
    reason: Option<&str>,
    now: DateTime<Utc>,
) {
    for document in prospect
        .documents
        .iter_mut()
        .filter(|d| d.status == DocumentStatus::Pending)
    {
        document.status = outcome;
        document.reviewed_at = Some(now);
        document.rejection_reason = reason.map(str::to_string);
    }
}
