//! Status transition logic
//!
//! Pure functions for applying a status transition to a prospect.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::errors::{PipelineError, Result};
use crate::schemas::{DocumentStatus, DocumentUpload, KycSubmission, Prospect, ProspectStatus};

use super::documents;
use super::validation::{can_enter_pre_qualified, normalize_reason, validate_transition};

/// Extra data carried by a transition request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionFields {
    /// Questionnaire answers, accepted on kyc_submitted
    pub kyc: Option<KycSubmission>,

    /// Bases the manager adds while reviewing
    pub accreditation_bases: BTreeSet<String>,

    /// Required for documents_rejected
    pub rejection_reason: Option<String>,

    /// New documents with their assigned ids; required for documents_pending
    pub uploads: Vec<(String, DocumentUpload)>,

    /// Required for converted, rejected everywhere else
    pub investor_id: Option<String>,

    /// Replaces the manager notes when present
    pub notes: Option<String>,
}

impl TransitionFields {
    pub fn with_kyc(mut self, kyc: KycSubmission) -> Self {
        self.kyc = Some(kyc);
        self
    }

    pub fn with_accreditation_bases<I, S>(mut self, bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accreditation_bases
            .extend(bases.into_iter().map(Into::into));
        self
    }

    pub fn with_rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.rejection_reason = Some(reason.into());
        self
    }

    pub fn with_uploads(mut self, uploads: Vec<(String, DocumentUpload)>) -> Self {
        self.uploads = uploads;
        self
    }

    pub fn with_investor_id(mut self, investor_id: impl Into<String>) -> Self {
        self.investor_id = Some(investor_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Check the fields a transition needs before anything is built.
fn check_required_fields(
    prospect: &Prospect,
    requested: ProspectStatus,
    fields: &TransitionFields,
) -> Result<()> {
    match requested {
        ProspectStatus::DocumentsApproved => documents::can_approve_documents(prospect)?,
        ProspectStatus::DocumentsRejected => {
            normalize_reason(fields.rejection_reason.as_deref().unwrap_or_default())?;
        }
        ProspectStatus::DocumentsPending if fields.uploads.is_empty() => {
            return Err(PipelineError::Validation(
                "at least one document must be uploaded".to_string(),
            ));
        }
        ProspectStatus::Converted => {
            super::conversion::can_convert_to_investor(prospect)?;
            if fields.investor_id.is_none() {
                return Err(PipelineError::Validation(
                    "conversion requires an investor id".to_string(),
                ));
            }
        }
        _ => {}
    }

    if requested != ProspectStatus::Converted && fields.investor_id.is_some() {
        return Err(PipelineError::Validation(format!(
            "investor id can only be set on conversion, not on {}",
            requested
        )));
    }
    if requested != ProspectStatus::KycSubmitted && fields.kyc.is_some() {
        return Err(PipelineError::Validation(format!(
            "KYC answers can only be submitted on kyc_submitted, not on {}",
            requested
        )));
    }
    Ok(())
}

/// Pure function that applies a status transition to a prospect.
///
/// This function:
/// - Never mutates the input prospect
/// - Rejects illegal edges and failed guards before building anything
/// - Stamps the entered stage only the first time it is entered
/// - Returns the new prospect with `updated_at = now`
pub fn apply_transition(
    prospect: &Prospect,
    requested: ProspectStatus,
    fields: TransitionFields,
    now: DateTime<Utc>,
) -> Result<Prospect> {
    validate_transition(prospect.status, requested)?;
    check_required_fields(prospect, requested, &fields)?;

    let mut next = prospect.clone();

    if let Some(kyc) = fields.kyc {
        next.accreditation_bases.extend(kyc.accreditation_bases);
        next.intent = kyc.intent;
        if kyc.investor_type.is_some() {
            next.investor_type = kyc.investor_type;
        }
        if kyc.phone.is_some() {
            next.phone = kyc.phone;
        }
        if let Some(address) = kyc.address {
            next.address = address;
        }
    }
    next.accreditation_bases.extend(
        fields
            .accreditation_bases
            .into_iter()
            .map(|basis| basis.trim().to_string())
            .filter(|basis| !basis.is_empty()),
    );
    if let Some(notes) = fields.notes {
        next.notes = Some(notes);
    }

    match requested {
        ProspectStatus::PreQualified => can_enter_pre_qualified(&next)?,
        ProspectStatus::DocumentsPending => {
            next.document_cycle += 1;
            documents::append_uploads(&mut next, fields.uploads, now);
        }
        ProspectStatus::DocumentsApproved => {
            documents::review_pending(&mut next, DocumentStatus::Approved, None, now);
        }
        ProspectStatus::DocumentsRejected => {
            let reason = normalize_reason(fields.rejection_reason.as_deref().unwrap_or_default())?;
            documents::review_pending(&mut next, DocumentStatus::Rejected, Some(&reason), now);
            next.document_rejection_reason = Some(reason);
        }
        ProspectStatus::Converted => {
            next.investor_id = fields.investor_id;
            next.converted_to_investor = true;
        }
        _ => {}
    }

    next.status = requested;
    next.stages.stamp_first(requested, now);
    next.updated_at = now;
    Ok(next)
}
