//! Template variables and subject lines for pipeline emails
//!
//! Bodies are rendered by the email service; the pipeline only supplies
//! variables and a subject. Subjects support {{variable}} substitution and
//! {{#if var}}...{{/if}} conditionals.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::schemas::{EmailTemplate, PipelineConfig, Prospect};

/// Variables handed to the email service with a template name
pub type TemplateVariables = BTreeMap<String, String>;

/// Subject line pattern for a template
pub fn subject_template(template: EmailTemplate) -> &'static str {
    match template {
        EmailTemplate::KycInvitation => "{{fund_name}}: please complete your investor questionnaire",
        EmailTemplate::KycReminder => "Reminder: your {{fund_name}} questionnaire is waiting",
        EmailTemplate::MeetingInvite => "{{fund_name}}: let's schedule an introductory meeting",
        EmailTemplate::MeetingConfirmation => "{{fund_name}}: your meeting is confirmed",
        EmailTemplate::PostMeetingOnboarding => "{{fund_name}}: next steps to open your account",
        EmailTemplate::OnboardingReminder => "Reminder: finish your {{fund_name}} onboarding",
        EmailTemplate::DocumentRejection => "{{fund_name}}: we need updated documents",
        EmailTemplate::DocumentsApprovedDocuSign => {
            "{{fund_name}}: documents approved, subscription agreement on its way"
        }
        EmailTemplate::WelcomeInvestor => "Welcome to {{fund_name}}{{#if recipient_name}}, {{recipient_name}}{{/if}}",
    }
}

/// Build the variables for a template from the prospect and fund settings
pub fn variables_for(
    template: EmailTemplate,
    prospect: &Prospect,
    config: &PipelineConfig,
) -> TemplateVariables {
    let mut vars = TemplateVariables::new();
    let portal = config.portal_url.trim_end_matches('/');

    vars.insert("fund_name".to_string(), config.fund_name.clone());
    vars.insert("support_email".to_string(), config.support_email.clone());
    vars.insert("prospect_id".to_string(), prospect.id.clone());
    if let Some(name) = prospect.identity.salutation_name() {
        vars.insert("recipient_name".to_string(), name);
    }

    match template {
        EmailTemplate::KycInvitation | EmailTemplate::KycReminder => {
            vars.insert(
                "kyc_url".to_string(),
                format!("{}/kyc/{}", portal, prospect.id),
            );
        }
        EmailTemplate::MeetingInvite | EmailTemplate::MeetingConfirmation => {
            vars.insert("meeting_url".to_string(), config.meeting_url.clone());
        }
        EmailTemplate::PostMeetingOnboarding | EmailTemplate::OnboardingReminder => {
            vars.insert("onboarding_url".to_string(), format!("{}/onboarding", portal));
        }
        EmailTemplate::DocumentRejection => {
            vars.insert("documents_url".to_string(), format!("{}/documents", portal));
            if let Some(reason) = &prospect.document_rejection_reason {
                vars.insert("rejection_reason".to_string(), reason.clone());
            }
        }
        EmailTemplate::DocumentsApprovedDocuSign => {}
        EmailTemplate::WelcomeInvestor => {
            vars.insert("portal_url".to_string(), portal.to_string());
            if let Some(investor_id) = &prospect.investor_id {
                vars.insert("investor_id".to_string(), investor_id.clone());
            }
        }
    }

    vars
}

fn if_regex() -> &'static Regex {
    static IF_BLOCK: OnceLock<Regex> = OnceLock::new();
    IF_BLOCK.get_or_init(|| {
        Regex::new(r"\{\{#if\s+(\w+)\}\}([\s\S]*?)\{\{/if\}\}").expect("if pattern is valid")
    })
}

fn var_regex() -> &'static Regex {
    static VAR: OnceLock<Regex> = OnceLock::new();
    VAR.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("variable pattern is valid"))
}

/// Render a subject pattern with variable substitution.
///
/// Unknown variables render as empty strings.
pub fn render_subject(template: &str, vars: &TemplateVariables) -> String {
    let result = if_regex()
        .replace_all(template, |caps: &regex::Captures| {
            match vars.get(&caps[1]) {
                Some(val) if !val.is_empty() => caps[2].to_string(),
                _ => String::new(),
            }
        })
        .to_string();

    var_regex()
        .replace_all(&result, |caps: &regex::Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .to_string()
}
