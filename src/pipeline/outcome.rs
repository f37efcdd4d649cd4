//! Requests accepted and outcomes returned by the pipeline

use serde::{Deserialize, Serialize};

use crate::email::EmailIntent;
use crate::errors::EmailError;
use crate::schemas::{EmailTemplate, Identity, Investor, Prospect};

/// A prospect about to enter the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProspect {
    pub email: String,
    pub identity: Identity,
    /// Defaults to the configured fund
    #[serde(default)]
    pub fund_id: Option<String>,
    #[serde(default)]
    pub investor_type: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewProspect {
    pub fn new(email: impl Into<String>, identity: Identity) -> Self {
        NewProspect {
            email: email.into(),
            identity,
            fund_id: None,
            investor_type: None,
            phone: None,
            notes: None,
        }
    }

    pub fn in_fund(mut self, fund_id: impl Into<String>) -> Self {
        self.fund_id = Some(fund_id.into());
        self
    }
}

/// What happened to the email a change triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailDelivery {
    /// No email for this change, or it was suppressed
    NotRequired,
    Sent(EmailTemplate),
    /// The change is committed; the email was not delivered and can be retried
    /// with [`Pipeline::redeliver`](super::Pipeline::redeliver)
    Failed {
        intent: Box<EmailIntent>,
        error: EmailError,
    },
}

impl EmailDelivery {
    pub fn template(&self) -> Option<EmailTemplate> {
        match self {
            EmailDelivery::NotRequired => None,
            EmailDelivery::Sent(template) => Some(*template),
            EmailDelivery::Failed { intent, .. } => Some(intent.template),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EmailDelivery::Failed { .. })
    }
}

impl std::fmt::Display for EmailDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmailDelivery::NotRequired => write!(f, "no email"),
            EmailDelivery::Sent(template) => write!(f, "sent {}", template),
            EmailDelivery::Failed { intent, error } => {
                write!(f, "{} not delivered: {}", intent.template, error)
            }
        }
    }
}

/// Result of a committed status change
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub prospect: Prospect,
    pub email: EmailDelivery,
}

/// Result of a committed conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub prospect: Prospect,
    pub investor: Investor,
    pub email: EmailDelivery,
}
