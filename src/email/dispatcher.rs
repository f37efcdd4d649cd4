//! Email trigger dispatch policy
//!
//! Pure decisions mapping a status change, or an explicit event, to at most one
//! email intent. Suppression rules:
//! - nothing is sent once the prospect has left the pipeline (terminal status)
//! - a decision point answered once (same class and cycle) is never answered again,
//!   neither with the same template nor with the opposite outcome
//! - reminders only go out in the status they target

use tracing::debug;

use crate::domain::is_terminal_state;
use crate::errors::{PipelineError, Result};
use crate::schemas::{
    EmailLogEntry, EmailTemplate, Prospect, ProspectSource, ProspectStatus, SuppressionClass,
};

use super::intent::{EmailContext, EmailIntent, ReminderKind};

/// Template a status change triggers, before suppression.
///
/// not_eligible is silent: no email ever tells a prospect they were declined.
pub fn template_for(previous: ProspectStatus, new: ProspectStatus) -> Option<EmailTemplate> {
    use ProspectStatus::*;
    match (previous, new) {
        (_, NotEligible) => None,
        (KycSubmitted, PreQualified) => Some(EmailTemplate::MeetingInvite),
        (PreQualified, MeetingScheduled) => Some(EmailTemplate::MeetingConfirmation),
        (MeetingComplete, AccountInviteSent) => Some(EmailTemplate::PostMeetingOnboarding),
        (DocumentsPending, DocumentsRejected) => Some(EmailTemplate::DocumentRejection),
        (DocumentsPending, DocumentsApproved) => Some(EmailTemplate::DocumentsApprovedDocuSign),
        (DocusignSigned, Converted) => Some(EmailTemplate::WelcomeInvestor),
        _ => None,
    }
}

/// Whether the log already answers the decision point of this intent
fn already_answered(log: &[EmailLogEntry], class: SuppressionClass, cycle: u32) -> bool {
    class != SuppressionClass::Reminder
        && log
            .iter()
            .any(|entry| entry.class == class && entry.cycle == cycle)
}

/// Whether delivering `intent` now would answer a decision point twice,
/// or reach a prospect that has left the pipeline
pub fn is_suppressed(intent: &EmailIntent, prospect: &Prospect) -> bool {
    let out_of_pipeline = match prospect.status {
        ProspectStatus::Converted => intent.template != EmailTemplate::WelcomeInvestor,
        ProspectStatus::NotEligible => true,
        _ => false,
    };
    out_of_pipeline || already_answered(&prospect.email_log, intent.class, intent.cycle)
}

/// Decide the email for a status change.
///
/// `ctx.prospect` is the snapshot after the change; its email log carries what
/// was already delivered.
pub fn decide_email(
    previous: ProspectStatus,
    new: ProspectStatus,
    ctx: &EmailContext<'_>,
) -> Option<EmailIntent> {
    if is_terminal_state(previous) {
        return None;
    }
    let template = template_for(previous, new)?;
    let intent = EmailIntent::build(template, ctx);

    if already_answered(&ctx.prospect.email_log, intent.class, intent.cycle) {
        debug!(
            prospect_id = %ctx.prospect.id,
            template = %template,
            cycle = intent.cycle,
            "email suppressed: decision point already answered"
        );
        return None;
    }
    Some(intent)
}

/// Decide the invitation email for a freshly created prospect.
///
/// Only manager invitations send one; self-registered prospects already have the form.
pub fn decide_invitation(ctx: &EmailContext<'_>) -> Option<EmailIntent> {
    let prospect = ctx.prospect;
    if prospect.status != ProspectStatus::KycSent || prospect.source != ProspectSource::ManagerInvite {
        return None;
    }
    let intent = EmailIntent::build(EmailTemplate::KycInvitation, ctx);
    if already_answered(&prospect.email_log, intent.class, intent.cycle) {
        return None;
    }
    Some(intent)
}

/// Decide a reminder, failing when the prospect is not in the targeted status
pub fn decide_reminder(kind: ReminderKind, ctx: &EmailContext<'_>) -> Result<EmailIntent> {
    let status = ctx.prospect.status;
    if status != kind.target_status() {
        return Err(PipelineError::ReminderNotApplicable {
            reminder: kind,
            status,
        });
    }
    Ok(EmailIntent::build(kind.template(), ctx))
}
