//! Email dispatch: which notification a change triggers, and how it is delivered

mod dispatcher;
mod intent;
mod service;
mod templates;

pub use dispatcher::{
    decide_email, decide_invitation, decide_reminder, is_suppressed, template_for,
};
pub use intent::{suppression_class, EmailContext, EmailIntent, ReminderKind};
pub use service::{
    EmailService, LogEmailService, OutboxEmailService, OutboxMessage, RecordingEmailService,
    SentEmail,
};
pub use templates::{render_subject, subject_template, variables_for, TemplateVariables};
