//! Email intents - Which notification should go out, before it is sent

use serde::{Deserialize, Serialize};

use crate::schemas::{
    EmailLogEntry, EmailTemplate, PipelineConfig, Prospect, ProspectStatus, SuppressionClass,
};

use super::templates::{render_subject, subject_template, variables_for, TemplateVariables};

/// Reminder a manager can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    Kyc,
    Onboarding,
}

impl ReminderKind {
    pub fn template(&self) -> EmailTemplate {
        match self {
            ReminderKind::Kyc => EmailTemplate::KycReminder,
            ReminderKind::Onboarding => EmailTemplate::OnboardingReminder,
        }
    }

    /// The only status in which this reminder may be sent
    pub fn target_status(&self) -> ProspectStatus {
        match self {
            ReminderKind::Kyc => ProspectStatus::KycSent,
            ReminderKind::Onboarding => ProspectStatus::AccountCreated,
        }
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::Kyc => write!(f, "KYC reminder"),
            ReminderKind::Onboarding => write!(f, "onboarding reminder"),
        }
    }
}

impl std::str::FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kyc" => Ok(ReminderKind::Kyc),
            "onboarding" => Ok(ReminderKind::Onboarding),
            _ => Err(format!("Unknown reminder: {}", s)),
        }
    }
}

/// What the dispatcher looks at besides the two statuses
#[derive(Debug, Clone, Copy)]
pub struct EmailContext<'a> {
    /// Prospect snapshot after the transition was applied
    pub prospect: &'a Prospect,
    pub config: &'a PipelineConfig,
}

impl<'a> EmailContext<'a> {
    pub fn new(prospect: &'a Prospect, config: &'a PipelineConfig) -> Self {
        EmailContext { prospect, config }
    }
}

/// A decided notification, ready for the email service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailIntent {
    pub template: EmailTemplate,
    pub class: SuppressionClass,
    /// Document cycle the decision belongs to (0 outside document review)
    pub cycle: u32,
    pub prospect_id: String,
    pub recipient: String,
    pub subject: String,
    pub variables: TemplateVariables,
}

impl EmailIntent {
    pub(crate) fn build(template: EmailTemplate, ctx: &EmailContext<'_>) -> Self {
        let class = suppression_class(template);
        let cycle = match class {
            SuppressionClass::DocumentReview => ctx.prospect.document_cycle,
            _ => 0,
        };
        let variables = variables_for(template, ctx.prospect, ctx.config);
        EmailIntent {
            template,
            class,
            cycle,
            prospect_id: ctx.prospect.id.clone(),
            recipient: ctx.prospect.email.clone(),
            subject: render_subject(subject_template(template), &variables),
            variables,
        }
    }

    /// Log entry to record once the email has been delivered
    pub fn log_entry(&self, sent_at: chrono::DateTime<chrono::Utc>) -> EmailLogEntry {
        EmailLogEntry {
            template: self.template,
            class: self.class,
            cycle: self.cycle,
            sent_at,
        }
    }
}

/// Decision point a template answers
pub fn suppression_class(template: EmailTemplate) -> SuppressionClass {
    match template {
        EmailTemplate::KycInvitation => SuppressionClass::Invitation,
        EmailTemplate::MeetingInvite => SuppressionClass::Qualification,
        EmailTemplate::MeetingConfirmation => SuppressionClass::Meeting,
        EmailTemplate::PostMeetingOnboarding => SuppressionClass::Onboarding,
        EmailTemplate::DocumentRejection | EmailTemplate::DocumentsApprovedDocuSign => {
            SuppressionClass::DocumentReview
        }
        EmailTemplate::WelcomeInvestor => SuppressionClass::Conversion,
        EmailTemplate::KycReminder | EmailTemplate::OnboardingReminder => {
            SuppressionClass::Reminder
        }
    }
}
