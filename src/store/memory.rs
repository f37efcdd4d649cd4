//! In-memory prospect store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::errors::{PipelineError, Result};
use crate::schemas::{EmailLogEntry, Investor, InvestorDraft, Prospect, ProspectStatus};

use super::{check_conversion, check_expected, committed, not_found, ProspectStore};

#[derive(Debug, Default)]
struct State {
    prospects: HashMap<String, Prospect>,
    investors: HashMap<String, Investor>,
}

/// Store backed by hash maps behind one lock, so conversion is a single critical section
#[derive(Debug, Default)]
pub struct InMemoryProspectStore {
    state: RwLock<State>,
}

impl InMemoryProspectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn investor_count(&self) -> usize {
        self.state.read().investors.len()
    }
}

#[async_trait]
impl ProspectStore for InMemoryProspectStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Prospect>> {
        Ok(self.state.read().prospects.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str, fund_id: &str) -> Result<Option<Prospect>> {
        Ok(self
            .state
            .read()
            .prospects
            .values()
            .find(|p| p.fund_id == fund_id && p.email == email)
            .cloned())
    }

    async fn list(&self, fund_id: Option<&str>) -> Result<Vec<Prospect>> {
        let state = self.state.read();
        let mut prospects: Vec<Prospect> = state
            .prospects
            .values()
            .filter(|p| fund_id.map_or(true, |f| p.fund_id == f))
            .cloned()
            .collect();
        prospects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prospects)
    }

    async fn insert(&self, prospect: &Prospect) -> Result<()> {
        let mut state = self.state.write();
        let taken = state
            .prospects
            .values()
            .any(|p| p.fund_id == prospect.fund_id && p.email == prospect.email);
        if taken {
            return Err(PipelineError::DuplicateProspect {
                email: prospect.email.clone(),
                fund_id: prospect.fund_id.clone(),
            });
        }
        if state.prospects.contains_key(&prospect.id) {
            return Err(PipelineError::Validation(format!(
                "prospect id {} already exists",
                prospect.id
            )));
        }
        state.prospects.insert(prospect.id.clone(), prospect.clone());
        debug!(prospect_id = %prospect.id, "prospect inserted");
        Ok(())
    }

    async fn update_status(
        &self,
        prospect: &Prospect,
        expected: ProspectStatus,
    ) -> Result<Prospect> {
        let mut state = self.state.write();
        let stored = state
            .prospects
            .get_mut(&prospect.id)
            .ok_or_else(|| not_found(&prospect.id))?;
        check_expected(stored, expected, prospect.version)?;

        *stored = committed(stored, prospect);
        Ok(stored.clone())
    }

    async fn create_investor_from_prospect(
        &self,
        draft: &InvestorDraft,
        converted: &Prospect,
    ) -> Result<Investor> {
        check_conversion(draft, converted)?;

        let mut state = self.state.write();
        let stored = state
            .prospects
            .get(&converted.id)
            .ok_or_else(|| not_found(&converted.id))?;
        check_expected(stored, ProspectStatus::DocusignSigned, converted.version)?;
        if state.investors.contains_key(&draft.id) {
            return Err(PipelineError::Validation(format!(
                "investor id {} already exists",
                draft.id
            )));
        }

        let investor = Investor::from(draft.clone());
        let record = committed(stored, converted);

        state.investors.insert(investor.id.clone(), investor.clone());
        state.prospects.insert(record.id.clone(), record);
        Ok(investor)
    }

    async fn record_email(&self, prospect_id: &str, entry: EmailLogEntry) -> Result<Prospect> {
        let mut state = self.state.write();
        let stored = state
            .prospects
            .get_mut(prospect_id)
            .ok_or_else(|| not_found(prospect_id))?;
        stored.email_log.push(entry);
        Ok(stored.clone())
    }

    async fn find_investor(&self, id: &str) -> Result<Option<Investor>> {
        Ok(self.state.read().investors.get(id).cloned())
    }
}
