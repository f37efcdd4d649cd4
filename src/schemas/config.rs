//! Config schema - Fund-level settings used when notifying prospects

use serde::{Deserialize, Serialize};

/// Main configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Fund the CLI operates on when none is given
    #[serde(default = "default_fund_id")]
    pub fund_id: String,

    /// Display name used in email variables
    #[serde(default = "default_fund_name")]
    pub fund_name: String,

    /// From address for outbound email
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Support contact printed in emails
    #[serde(default = "default_support_email")]
    pub support_email: String,

    /// Investor portal base URL (KYC form, onboarding, document upload)
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Booking link sent with the meeting invite
    #[serde(default = "default_meeting_url")]
    pub meeting_url: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_fund_id() -> String {
    "default".to_string()
}

fn default_fund_name() -> String {
    "Fund".to_string()
}

fn default_sender_email() -> String {
    "investor-relations@example.com".to_string()
}

fn default_support_email() -> String {
    "support@example.com".to_string()
}

fn default_portal_url() -> String {
    "https://portal.example.com".to_string()
}

fn default_meeting_url() -> String {
    "https://portal.example.com/meetings".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            schema_version: default_schema_version(),
            fund_id: default_fund_id(),
            fund_name: default_fund_name(),
            sender_email: default_sender_email(),
            support_email: default_support_email(),
            portal_url: default_portal_url(),
            meeting_url: default_meeting_url(),
        }
    }
}
