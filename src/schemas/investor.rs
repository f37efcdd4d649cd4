//! Investor schema - The record a prospect becomes on conversion

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::prospect::{Address, Identity};

/// Manager-supplied input for converting a prospect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionInput {
    /// Committed capital; must be positive
    pub commitment_amount: Decimal,
}

/// Fields needed to materialize an investor, not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorDraft {
    pub id: String,
    pub fund_id: String,
    pub prospect_id: String,
    pub email: String,
    pub identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub accreditation_bases: BTreeSet<String>,
    pub commitment_amount: Decimal,
    pub joined_at: DateTime<Utc>,
}

/// A fully onboarded investor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub schema_version: u32,
    pub id: String,
    pub fund_id: String,
    pub prospect_id: String,
    pub email: String,
    pub identity: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub accreditation_bases: BTreeSet<String>,
    pub commitment_amount: Decimal,
    pub joined_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<InvestorDraft> for Investor {
    fn from(draft: InvestorDraft) -> Self {
        Investor {
            schema_version: 1,
            id: draft.id,
            fund_id: draft.fund_id,
            prospect_id: draft.prospect_id,
            email: draft.email,
            identity: draft.identity,
            investor_type: draft.investor_type,
            phone: draft.phone,
            address: draft.address,
            accreditation_bases: draft.accreditation_bases,
            commitment_amount: draft.commitment_amount,
            created_at: draft.joined_at,
            joined_at: draft.joined_at,
        }
    }
}
