//! Prospect pipeline state machine definitions
//!
//! kyc_sent → kyc_submitted → pre_qualified → meeting_scheduled → meeting_complete
//! → account_invite_sent → account_created → onboarding_submitted → documents_pending
//! → documents_approved → docusign_sent → docusign_signed → converted
//!
//! documents_pending may instead go to documents_rejected, which loops back to
//! documents_pending on re-submission. Every non-terminal status may also be
//! forced to not_eligible.

use crate::schemas::ProspectStatus;

/// Every status, in pipeline order.
pub const PROSPECT_STATUSES: &[ProspectStatus] = &[
    ProspectStatus::KycSent,
    ProspectStatus::KycSubmitted,
    ProspectStatus::PreQualified,
    ProspectStatus::NotEligible,
    ProspectStatus::MeetingScheduled,
    ProspectStatus::MeetingComplete,
    ProspectStatus::AccountInviteSent,
    ProspectStatus::AccountCreated,
    ProspectStatus::OnboardingSubmitted,
    ProspectStatus::DocumentsPending,
    ProspectStatus::DocumentsApproved,
    ProspectStatus::DocumentsRejected,
    ProspectStatus::DocusignSent,
    ProspectStatus::DocusignSigned,
    ProspectStatus::Converted,
];

/// The transition table, excluding the not_eligible escape edge.
///
/// IMPORTANT: This is the single source of truth for forward edges.
pub const TRANSITIONS: &[(ProspectStatus, ProspectStatus)] = &[
    (ProspectStatus::KycSent, ProspectStatus::KycSubmitted),
    (ProspectStatus::KycSubmitted, ProspectStatus::PreQualified),
    (ProspectStatus::PreQualified, ProspectStatus::MeetingScheduled),
    (ProspectStatus::MeetingScheduled, ProspectStatus::MeetingComplete),
    (ProspectStatus::MeetingComplete, ProspectStatus::AccountInviteSent),
    (ProspectStatus::AccountInviteSent, ProspectStatus::AccountCreated),
    (ProspectStatus::AccountCreated, ProspectStatus::OnboardingSubmitted),
    (ProspectStatus::OnboardingSubmitted, ProspectStatus::DocumentsPending),
    (ProspectStatus::DocumentsPending, ProspectStatus::DocumentsApproved),
    (ProspectStatus::DocumentsPending, ProspectStatus::DocumentsRejected),
    (ProspectStatus::DocumentsRejected, ProspectStatus::DocumentsPending),
    (ProspectStatus::DocumentsApproved, ProspectStatus::DocusignSent),
    (ProspectStatus::DocusignSent, ProspectStatus::DocusignSigned),
    (ProspectStatus::DocusignSigned, ProspectStatus::Converted),
];

/// Check if a status has no outgoing transition.
pub fn is_terminal_state(status: ProspectStatus) -> bool {
    matches!(
        status,
        ProspectStatus::Converted | ProspectStatus::NotEligible
    )
}

/// Returns the statuses reachable in one step from `current`.
///
/// Forward edges come first, in table order; not_eligible is appended for every
/// non-terminal status.
pub fn get_allowed_next_states(current: ProspectStatus) -> Vec<ProspectStatus> {
    if is_terminal_state(current) {
        return vec![];
    }
    let mut next: Vec<ProspectStatus> = TRANSITIONS
        .iter()
        .filter(|(from, _)| *from == current)
        .map(|(_, to)| *to)
        .collect();
    next.push(ProspectStatus::NotEligible);
    next
}

/// The single forward status a prospect normally moves to, if unambiguous.
///
/// documents_pending has two outcomes and terminal statuses have none.
pub fn get_next_state(current: ProspectStatus) -> Option<ProspectStatus> {
    let mut forward = TRANSITIONS
        .iter()
        .filter(|(from, _)| *from == current)
        .map(|(_, to)| *to);
    match (forward.next(), forward.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
