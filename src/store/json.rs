//! JSON file prospect store
//!
//! One file per record under the data directory. Every read-check-write
//! sequence holds an exclusive `flock` on `.prospects/.lock`, so separate
//! processes (and separate store instances) serialize against each other;
//! each file write is atomic.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, warn};

use crate::errors::{PipelineError, Result};
use crate::fs;
use crate::schemas::{EmailLogEntry, Investor, InvestorDraft, Prospect, ProspectStatus};

use super::{check_conversion, check_expected, committed, not_found, ProspectStore};

const LOCK_FILE: &str = ".lock";

/// Exclusive lock on the data directory, released on drop
struct DataDirLock {
    file: File,
}

impl DataDirLock {
    fn acquire(root: &Path) -> Result<Self> {
        let dir = fs::get_data_dir(root);
        std::fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(DataDirLock { file })
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(error = %e, "data directory unlock failed; closing the file releases it");
        }
    }
}

#[derive(Debug)]
pub struct JsonProspectStore {
    root: PathBuf,
}

impl JsonProspectStore {
    /// Store rooted at the directory that contains `.prospects`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonProspectStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock(&self) -> Result<DataDirLock> {
        DataDirLock::acquire(&self.root)
    }

    fn read_optional(&self, id: &str) -> Result<Option<Prospect>> {
        match fs::read_prospect(&self.root, id) {
            Ok(prospect) => Ok(Some(prospect)),
            Err(PipelineError::FileNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_all(&self) -> Result<Vec<Prospect>> {
        fs::list_json_files(&fs::get_prospects_dir(&self.root))?
            .iter()
            .map(|path| fs::read_json(path))
            .collect()
    }
}

#[async_trait]
impl ProspectStore for JsonProspectStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Prospect>> {
        self.read_optional(id)
    }

    async fn find_by_email(&self, email: &str, fund_id: &str) -> Result<Option<Prospect>> {
        Ok(self
            .read_all()?
            .into_iter()
            .find(|p| p.fund_id == fund_id && p.email == email))
    }

    async fn list(&self, fund_id: Option<&str>) -> Result<Vec<Prospect>> {
        let mut prospects: Vec<Prospect> = self
            .read_all()?
            .into_iter()
            .filter(|p| fund_id.map_or(true, |f| p.fund_id == f))
            .collect();
        prospects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prospects)
    }

    async fn insert(&self, prospect: &Prospect) -> Result<()> {
        let _guard = self.lock()?;
        let taken = self
            .read_all()?
            .iter()
            .any(|p| p.fund_id == prospect.fund_id && p.email == prospect.email);
        if taken {
            return Err(PipelineError::DuplicateProspect {
                email: prospect.email.clone(),
                fund_id: prospect.fund_id.clone(),
            });
        }
        if self.read_optional(&prospect.id)?.is_some() {
            return Err(PipelineError::Validation(format!(
                "prospect id {} already exists",
                prospect.id
            )));
        }
        fs::write_prospect(&self.root, prospect)?;
        debug!(prospect_id = %prospect.id, "prospect written");
        Ok(())
    }

    async fn update_status(
        &self,
        prospect: &Prospect,
        expected: ProspectStatus,
    ) -> Result<Prospect> {
        let _guard = self.lock()?;
        let stored = self
            .read_optional(&prospect.id)?
            .ok_or_else(|| not_found(&prospect.id))?;
        check_expected(&stored, expected, prospect.version)?;

        let record = committed(&stored, prospect);
        fs::write_prospect(&self.root, &record)?;
        Ok(record)
    }

    async fn create_investor_from_prospect(
        &self,
        draft: &InvestorDraft,
        converted: &Prospect,
    ) -> Result<Investor> {
        check_conversion(draft, converted)?;

        let _guard = self.lock()?;
        let stored = self
            .read_optional(&converted.id)?
            .ok_or_else(|| not_found(&converted.id))?;
        check_expected(&stored, ProspectStatus::DocusignSigned, converted.version)?;

        let investor_path = fs::get_investor_path(&self.root, &draft.id);
        if investor_path.exists() {
            return Err(PipelineError::Validation(format!(
                "investor id {} already exists",
                draft.id
            )));
        }

        let investor = Investor::from(draft.clone());
        fs::write_investor(&self.root, &investor)?;

        let record = committed(&stored, converted);
        if let Err(e) = fs::write_prospect(&self.root, &record) {
            // Undo the investor so the pair stays all-or-nothing
            if let Err(cleanup) = std::fs::remove_file(&investor_path) {
                warn!(
                    investor_id = %investor.id,
                    error = %cleanup,
                    "failed to remove investor after prospect write failed"
                );
            }
            return Err(e);
        }
        Ok(investor)
    }

    async fn record_email(&self, prospect_id: &str, entry: EmailLogEntry) -> Result<Prospect> {
        let _guard = self.lock()?;
        let mut stored = self
            .read_optional(prospect_id)?
            .ok_or_else(|| not_found(prospect_id))?;
        stored.email_log.push(entry);
        fs::write_prospect(&self.root, &stored)?;
        Ok(stored)
    }

    async fn find_investor(&self, id: &str) -> Result<Option<Investor>> {
        match fs::read_investor(&self.root, id) {
            Ok(investor) => Ok(Some(investor)),
            Err(PipelineError::FileNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
