//! Prospect schema - A prospective investor moving through the pipeline

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::{Document, DocumentStatus};
use super::email_log::EmailLogEntry;

/// Pipeline status of a prospect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectStatus {
    /// KYC questionnaire sent (initial)
    KycSent,
    /// Prospect returned the KYC questionnaire
    KycSubmitted,
    /// Manager approved accreditation
    PreQualified,
    /// Prospect failed qualification or was removed by a manager (terminal)
    NotEligible,
    MeetingScheduled,
    MeetingComplete,
    AccountInviteSent,
    AccountCreated,
    OnboardingSubmitted,
    /// Validation documents awaiting review
    DocumentsPending,
    DocumentsApproved,
    DocumentsRejected,
    /// Subscription agreement sent for e-signature
    DocusignSent,
    DocusignSigned,
    /// Investor record created (terminal)
    Converted,
}

impl ProspectStatus {
    /// Snake-case wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::KycSent => "kyc_sent",
            ProspectStatus::KycSubmitted => "kyc_submitted",
            ProspectStatus::PreQualified => "pre_qualified",
            ProspectStatus::NotEligible => "not_eligible",
            ProspectStatus::MeetingScheduled => "meeting_scheduled",
            ProspectStatus::MeetingComplete => "meeting_complete",
            ProspectStatus::AccountInviteSent => "account_invite_sent",
            ProspectStatus::AccountCreated => "account_created",
            ProspectStatus::OnboardingSubmitted => "onboarding_submitted",
            ProspectStatus::DocumentsPending => "documents_pending",
            ProspectStatus::DocumentsApproved => "documents_approved",
            ProspectStatus::DocumentsRejected => "documents_rejected",
            ProspectStatus::DocusignSent => "docusign_sent",
            ProspectStatus::DocusignSigned => "docusign_signed",
            ProspectStatus::Converted => "converted",
        }
    }
}

impl std::fmt::Display for ProspectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProspectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::domain::PROSPECT_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown prospect status: {}", s))
    }
}

/// Whether the prospect is a natural person or a legal entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestorCategory {
    Individual,
    Entity,
}

impl std::fmt::Display for InvestorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestorCategory::Individual => write!(f, "individual"),
            InvestorCategory::Entity => write!(f, "entity"),
        }
    }
}

impl std::str::FromStr for InvestorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(InvestorCategory::Individual),
            "entity" => Ok(InvestorCategory::Entity),
            _ => Err(format!("Unknown investor category: {}", s)),
        }
    }
}

/// Name fields, branched on the investor category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Identity {
    Individual {
        #[serde(default)]
        first_name: Option<String>,
        #[serde(default)]
        last_name: Option<String>,
    },
    Entity {
        #[serde(default)]
        legal_name: Option<String>,
        /// Person signing on behalf of the entity
        #[serde(default)]
        signatory_name: Option<String>,
    },
}

impl Identity {
    /// The category this identity belongs to
    pub fn category(&self) -> InvestorCategory {
        match self {
            Identity::Individual { .. } => InvestorCategory::Individual,
            Identity::Entity { .. } => InvestorCategory::Entity,
        }
    }

    /// Best display name available, if any
    pub fn display_name(&self) -> Option<String> {
        match self {
            Identity::Individual {
                first_name,
                last_name,
            } => {
                let parts: Vec<&str> = [first_name.as_deref(), last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|p| !p.trim().is_empty())
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            Identity::Entity {
                legal_name,
                signatory_name,
            } => legal_name
                .clone()
                .or_else(|| signatory_name.clone())
                .filter(|n| !n.trim().is_empty()),
        }
    }

    /// Name used in salutations ("Dear ...")
    pub fn salutation_name(&self) -> Option<String> {
        match self {
            Identity::Individual { first_name, .. } => first_name.clone(),
            Identity::Entity { signatory_name, .. } => signatory_name.clone(),
        }
        .filter(|n| !n.trim().is_empty())
        .or_else(|| self.display_name())
    }
}

/// Postal address, every line optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Informational commercial intent collected during KYC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommercialIntent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicative_commitment: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
}

/// Answers collected by the KYC questionnaire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycSubmission {
    #[serde(default)]
    pub accreditation_bases: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub intent: CommercialIntent,
}

/// How the prospect entered the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectSource {
    ManagerInvite,
    SelfRegistration,
}

/// First-entry timestamp of every stage.
///
/// Each field is written the first time its stage is entered and never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimestamps {
    #[serde(default)]
    pub kyc_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub kyc_submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pre_qualified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub not_eligible_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub account_invite_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub account_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub onboarding_submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents_submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents_approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents_rejected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub docusign_sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub docusign_signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub converted_at: Option<DateTime<Utc>>,
}

impl StageTimestamps {
    /// The timestamp slot belonging to a status
    pub fn slot(&self, status: ProspectStatus) -> Option<DateTime<Utc>> {
        match status {
            ProspectStatus::KycSent => self.kyc_sent_at,
            ProspectStatus::KycSubmitted => self.kyc_submitted_at,
            ProspectStatus::PreQualified => self.pre_qualified_at,
            ProspectStatus::NotEligible => self.not_eligible_at,
            ProspectStatus::MeetingScheduled => self.meeting_scheduled_at,
            ProspectStatus::MeetingComplete => self.meeting_completed_at,
            ProspectStatus::AccountInviteSent => self.account_invite_sent_at,
            ProspectStatus::AccountCreated => self.account_created_at,
            ProspectStatus::OnboardingSubmitted => self.onboarding_submitted_at,
            ProspectStatus::DocumentsPending => self.documents_submitted_at,
            ProspectStatus::DocumentsApproved => self.documents_approved_at,
            ProspectStatus::DocumentsRejected => self.documents_rejected_at,
            ProspectStatus::DocusignSent => self.docusign_sent_at,
            ProspectStatus::DocusignSigned => self.docusign_signed_at,
            ProspectStatus::Converted => self.converted_at,
        }
    }

    fn slot_mut(&mut self, status: ProspectStatus) -> &mut Option<DateTime<Utc>> {
        match status {
            ProspectStatus::KycSent => &mut self.kyc_sent_at,
            ProspectStatus::KycSubmitted => &mut self.kyc_submitted_at,
            ProspectStatus::PreQualified => &mut self.pre_qualified_at,
            ProspectStatus::NotEligible => &mut self.not_eligible_at,
            ProspectStatus::MeetingScheduled => &mut self.meeting_scheduled_at,
            ProspectStatus::MeetingComplete => &mut self.meeting_completed_at,
            ProspectStatus::AccountInviteSent => &mut self.account_invite_sent_at,
            ProspectStatus::AccountCreated => &mut self.account_created_at,
            ProspectStatus::OnboardingSubmitted => &mut self.onboarding_submitted_at,
            ProspectStatus::DocumentsPending => &mut self.documents_submitted_at,
            ProspectStatus::DocumentsApproved => &mut self.documents_approved_at,
            ProspectStatus::DocumentsRejected => &mut self.documents_rejected_at,
            ProspectStatus::DocusignSent => &mut self.docusign_sent_at,
            ProspectStatus::DocusignSigned => &mut self.docusign_signed_at,
            ProspectStatus::Converted => &mut self.converted_at,
        }
    }

    /// Stamp a stage if it has never been entered. Returns true when written.
    pub fn stamp_first(&mut self, status: ProspectStatus, at: DateTime<Utc>) -> bool {
        let slot = self.slot_mut(status);
        if slot.is_some() {
            return false;
        }
        *slot = Some(at);
        true
    }
}

/// A prospective investor of one fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prospect {
    /// Schema version for forward compatibility
    pub schema_version: u32,

    pub id: String,

    /// Owning fund; never changes after creation
    pub fund_id: String,

    pub identity: Identity,

    /// Free-form type code (e.g. "trust", "llc", "joint")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_type: Option<String>,

    /// Unique within the fund
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub address: Address,

    /// Qualifying-basis codes; must be non-empty before pre-qualification
    #[serde(default)]
    pub accreditation_bases: BTreeSet<String>,

    #[serde(default)]
    pub intent: CommercialIntent,

    pub status: ProspectStatus,

    /// Bumped by the store on every committed state write; optimistic
    /// writes must carry the version they were computed from
    #[serde(default)]
    pub version: u64,

    pub source: ProspectSource,

    #[serde(default)]
    pub stages: StageTimestamps,

    /// Set only when status becomes documents_rejected
    #[serde(default)]
    pub document_rejection_reason: Option<String>,

    /// Validation documents, including rejected history
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Incremented every time the prospect enters documents_pending
    #[serde(default)]
    pub document_cycle: u32,

    #[serde(default)]
    pub converted_to_investor: bool,

    #[serde(default)]
    pub investor_id: Option<String>,

    /// Delivered pipeline emails
    #[serde(default)]
    pub email_log: Vec<EmailLogEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Prospect {
    /// Create a prospect in the initial kyc_sent status
    pub fn new(
        id: String,
        fund_id: String,
        email: String,
        identity: Identity,
        source: ProspectSource,
        now: DateTime<Utc>,
    ) -> Self {
        let mut stages = StageTimestamps::default();
        stages.stamp_first(ProspectStatus::KycSent, now);
        Prospect {
            schema_version: 1,
            id,
            fund_id,
            identity,
            investor_type: None,
            email,
            phone: None,
            address: Address::default(),
            accreditation_bases: BTreeSet::new(),
            intent: CommercialIntent::default(),
            status: ProspectStatus::KycSent,
            version: 0,
            source,
            stages,
            document_rejection_reason: None,
            documents: Vec::new(),
            document_cycle: 0,
            converted_to_investor: false,
            investor_id: None,
            email_log: Vec::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn category(&self) -> InvestorCategory {
        self.identity.category()
    }

    /// Documents still awaiting review
    pub fn pending_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Pending)
    }

    pub fn has_pending_documents(&self) -> bool {
        self.pending_documents().next().is_some()
    }

    // ===== BUILDER METHODS =====

    pub fn with_investor_type(mut self, investor_type: impl Into<String>) -> Self {
        self.investor_type = Some(investor_type.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0).unwrap()
    }

    fn individual(first: &str, last: &str) -> Identity {
        Identity::Individual {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ProspectStatus::KycSent).unwrap(),
            "\"kyc_sent\""
        );
        assert_eq!(
            serde_json::to_string(&ProspectStatus::DocusignSigned).unwrap(),
            "\"docusign_signed\""
        );
        assert_eq!(
            serde_json::from_str::<ProspectStatus>("\"documents_rejected\"").unwrap(),
            ProspectStatus::DocumentsRejected
        );
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in crate::domain::PROSPECT_STATUSES {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
            assert_eq!(status.as_str().parse::<ProspectStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_status_from_str_unknown() {
        assert!("signed".parse::<ProspectStatus>().is_err());
    }

    #[test]
    fn test_new_prospect_starts_at_kyc_sent() {
        let prospect = Prospect::new(
            "p-1".to_string(),
            "fund-a".to_string(),
            "ada@example.com".to_string(),
            individual("Ada", "Lovelace"),
            ProspectSource::ManagerInvite,
            at(9),
        );

        assert_eq!(prospect.status, ProspectStatus::KycSent);
        assert_eq!(prospect.stages.kyc_sent_at, Some(at(9)));
        assert!(prospect.stages.kyc_submitted_at.is_none());
        assert!(prospect.investor_id.is_none());
        assert_eq!(prospect.category(), InvestorCategory::Individual);
    }

    #[test]
    fn test_stamp_first_never_overwrites() {
        let mut stages = StageTimestamps::default();
        assert!(stages.stamp_first(ProspectStatus::DocumentsRejected, at(10)));
        assert!(!stages.stamp_first(ProspectStatus::DocumentsRejected, at(12)));
        assert_eq!(stages.documents_rejected_at, Some(at(10)));
        assert_eq!(stages.slot(ProspectStatus::DocumentsRejected), Some(at(10)));
    }

    #[test]
    fn test_identity_names() {
        let person = individual("Ada", "Lovelace");
        assert_eq!(person.display_name(), Some("Ada Lovelace".to_string()));
        assert_eq!(person.salutation_name(), Some("Ada".to_string()));

        let entity = Identity::Entity {
            legal_name: Some("Analytical Engines LLC".to_string()),
            signatory_name: None,
        };
        assert_eq!(entity.category(), InvestorCategory::Entity);
        assert_eq!(entity.display_name(), Some("Analytical Engines LLC".to_string()));
        assert_eq!(entity.salutation_name(), Some("Analytical Engines LLC".to_string()));

        let blank = Identity::Individual {
            first_name: None,
            last_name: Some("  ".to_string()),
        };
        assert_eq!(blank.display_name(), None);
    }

    #[test]
    fn test_identity_serializes_tagged() {
        let json = serde_json::to_value(individual("Ada", "Lovelace")).unwrap();
        assert_eq!(json["category"], "individual");
        assert_eq!(json["first_name"], "Ada");
    }

    #[test]
    fn test_prospect_json_round_trip() {
        let prospect = Prospect::new(
            "p-2".to_string(),
            "fund-a".to_string(),
            "ops@engines.example".to_string(),
            Identity::Entity {
                legal_name: Some("Analytical Engines LLC".to_string()),
                signatory_name: Some("Charles Babbage".to_string()),
            },
            ProspectSource::SelfRegistration,
            at(8),
        )
        .with_investor_type("llc")
        .with_phone("+44 20 7946 0000");

        let json = serde_json::to_string_pretty(&prospect).unwrap();
        let parsed: Prospect = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, prospect);
    }
}
