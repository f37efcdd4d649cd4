//! Schema types for prospects, documents and investors
//!
//! Every persisted record serializes to snake_case JSON.

mod config;
mod document;
mod email_log;
mod investor;
mod prospect;

pub use config::PipelineConfig;
pub use document::{Document, DocumentKind, DocumentStatus, DocumentUpload};
pub use email_log::{EmailLogEntry, EmailTemplate, SuppressionClass};
pub use investor::{ConversionInput, Investor, InvestorDraft};
pub use prospect::{
    Address, CommercialIntent, Identity, InvestorCategory, KycSubmission, Prospect, ProspectSource,
    ProspectStatus, StageTimestamps,
};
