//! Email log schema - Record of notifications already delivered to a prospect

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline email templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTemplate {
    KycInvitation,
    KycReminder,
    MeetingInvite,
    MeetingConfirmation,
    PostMeetingOnboarding,
    OnboardingReminder,
    DocumentRejection,
    DocumentsApprovedDocuSign,
    WelcomeInvestor,
}

impl EmailTemplate {
    /// Template name handed to the email service
    pub fn name(&self) -> &'static str {
        match self {
            EmailTemplate::KycInvitation => "kyc_invitation",
            EmailTemplate::KycReminder => "kyc_reminder",
            EmailTemplate::MeetingInvite => "meeting_invite",
            EmailTemplate::MeetingConfirmation => "meeting_confirmation",
            EmailTemplate::PostMeetingOnboarding => "post_meeting_onboarding",
            EmailTemplate::OnboardingReminder => "onboarding_reminder",
            EmailTemplate::DocumentRejection => "document_rejection",
            EmailTemplate::DocumentsApprovedDocuSign => "documents_approved_docusign",
            EmailTemplate::WelcomeInvestor => "welcome_investor",
        }
    }
}

impl std::fmt::Display for EmailTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decision point an email answers.
///
/// Two templates in the same class are alternative outcomes of one decision;
/// only one of them may ever be delivered per class and cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionClass {
    Invitation,
    Qualification,
    Meeting,
    Onboarding,
    DocumentReview,
    Conversion,
    /// Reminders may repeat
    Reminder,
}

/// One delivered email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub template: EmailTemplate,
    pub class: SuppressionClass,
    /// Document cycle at send time
    pub cycle: u32,
    pub sent_at: DateTime<Utc>,
}
