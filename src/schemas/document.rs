//! Document schema - Validation documents uploaded during onboarding

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Pending => write!(f, "pending"),
            DocumentStatus::Approved => write!(f, "approved"),
            DocumentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// What the document evidences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Identity,
    ProofOfAddress,
    AccreditationEvidence,
    EntityFormation,
    TaxForm,
    Other,
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(DocumentKind::Identity),
            "proof_of_address" => Ok(DocumentKind::ProofOfAddress),
            "accreditation_evidence" => Ok(DocumentKind::AccreditationEvidence),
            "entity_formation" => Ok(DocumentKind::EntityFormation),
            "tax_form" => Ok(DocumentKind::TaxForm),
            "other" => Ok(DocumentKind::Other),
            _ => Err(format!("Unknown document kind: {}", s)),
        }
    }
}

/// A file the prospect submitted for validation.
///
/// Once reviewed a document is history: a rejected upload is never reopened,
/// the prospect uploads a new pending document instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    pub prospect_id: String,

    pub kind: DocumentKind,

    /// Original file name; storage is handled elsewhere
    pub file_name: String,

    pub status: DocumentStatus,

    /// Document cycle of the prospect this upload belongs to
    pub cycle: u32,

    pub uploaded_at: DateTime<Utc>,

    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// An upload request, before ids and cycle are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: String,
}

impl DocumentUpload {
    pub fn new(kind: DocumentKind, file_name: impl Into<String>) -> Self {
        DocumentUpload {
            kind,
            file_name: file_name.into(),
        }
    }
}
