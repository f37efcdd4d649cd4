//! Conversion of a signed prospect into an investor

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::{PipelineError, Result};
use crate::schemas::{ConversionInput, InvestorDraft, Prospect, ProspectStatus};

use super::transitions::{apply_transition, TransitionFields};
use super::validation::require_status;

/// Validate that the prospect can become an investor (docusign_signed only)
pub fn can_convert_to_investor(prospect: &Prospect) -> Result<()> {
    require_status(prospect, ProspectStatus::DocusignSigned, "convert to investor")
}

/// Build the investor record for a prospect without persisting anything.
///
/// The output depends only on the arguments; `investor_id` and `now` are
/// supplied by the caller.
pub fn prepare_investor_conversion(
    prospect: &Prospect,
    input: &ConversionInput,
    investor_id: &str,
    now: DateTime<Utc>,
) -> Result<InvestorDraft> {
    can_convert_to_investor(prospect)?;
    if input.commitment_amount <= Decimal::ZERO {
        return Err(PipelineError::Validation(format!(
            "commitment amount must be positive, got {}",
            input.commitment_amount
        )));
    }

    Ok(InvestorDraft {
        id: investor_id.to_string(),
        fund_id: prospect.fund_id.clone(),
        prospect_id: prospect.id.clone(),
        email: prospect.email.clone(),
        identity: prospect.identity.clone(),
        investor_type: prospect.investor_type.clone(),
        phone: prospect.phone.clone(),
        address: prospect.address.clone(),
        accreditation_bases: prospect.accreditation_bases.clone(),
        commitment_amount: input.commitment_amount,
        joined_at: now,
    })
}

/// Seal the prospect as converted, linking it to the investor
pub fn complete_conversion(
    prospect: &Prospect,
    investor_id: &str,
    now: DateTime<Utc>,
) -> Result<Prospect> {
    can_convert_to_investor(prospect)?;
    apply_transition(
        prospect,
        ProspectStatus::Converted,
        TransitionFields::default().with_investor_id(investor_id),
        now,
    )
}
