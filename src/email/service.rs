//! Email service collaborators
//!
//! The pipeline only decides what to send. Delivery goes through an
//! [`EmailService`], which may fail; failures never undo a committed transition.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::EmailError;
use crate::fs;
use crate::schemas::EmailTemplate;

use super::templates::TemplateVariables;

/// Outbound email delivery
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(
        &self,
        template: EmailTemplate,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), EmailError>;
}

/// Writes each email to the log instead of delivering it
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send(
        &self,
        template: EmailTemplate,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), EmailError> {
        info!(
            template = %template,
            recipient,
            variables = variables.len(),
            "email sent"
        );
        Ok(())
    }
}

/// One captured email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    pub template: EmailTemplate,
    pub recipient: String,
    pub variables: TemplateVariables,
}

/// In-memory email service that records every send.
///
/// Can be told to fail the next N sends, which is how delivery failures are
/// exercised in tests.
#[derive(Debug, Default)]
pub struct RecordingEmailService {
    sent: Mutex<Vec<SentEmail>>,
    failures: Mutex<Vec<EmailError>>,
}

impl RecordingEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an error returned by the next send
    pub fn fail_next(&self, error: EmailError) {
        self.failures.lock().push(error);
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().clone()
    }

    pub fn sent_templates(&self) -> Vec<EmailTemplate> {
        self.sent.lock().iter().map(|email| email.template).collect()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(
        &self,
        template: EmailTemplate,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), EmailError> {
        {
            let mut failures = self.failures.lock();
            if !failures.is_empty() {
                return Err(failures.remove(0));
            }
        }
        self.sent.lock().push(SentEmail {
            template,
            recipient: recipient.to_string(),
            variables: variables.clone(),
        });
        Ok(())
    }
}

/// Outbox message written by [`OutboxEmailService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub template: EmailTemplate,
    pub recipient: String,
    pub variables: TemplateVariables,
    pub queued_at: DateTime<Utc>,
}

/// Drops every email as a JSON file into an outbox directory for a relay to pick up
#[derive(Debug)]
pub struct OutboxEmailService {
    dir: PathBuf,
    seq: AtomicU64,
}

impl OutboxEmailService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        OutboxEmailService {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl EmailService for OutboxEmailService {
    async fn send(
        &self,
        template: EmailTemplate,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), EmailError> {
        if !recipient.contains('@') {
            return Err(EmailError::InvalidRecipient(recipient.to_string()));
        }

        let queued_at = Utc::now();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let file_name = format!(
            "{}-{:04}-{}.json",
            queued_at.format("%Y%m%dT%H%M%S%.3f"),
            seq,
            template.name()
        );
        let message = OutboxMessage {
            template,
            recipient: recipient.to_string(),
            variables: variables.clone(),
            queued_at,
        };

        fs::write_json(&self.dir.join(file_name), &message).map_err(|e| {
            warn!(error = %e, "failed to write outbox message");
            EmailError::Provider(e.to_string())
        })
    }
}
