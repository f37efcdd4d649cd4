//! Pipeline orchestrator
//!
//! Loads a prospect, runs the pure domain rule, commits with an optimistic
//! status check, then dispatches the email the change triggers. Email goes out
//! only after the commit and its failure never undoes the commit.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::domain::{
    self, apply_transition, get_next_state, normalize_email, TransitionFields,
};
use crate::email::{
    decide_email, decide_invitation, decide_reminder, is_suppressed, EmailContext, EmailIntent,
    EmailService, ReminderKind,
};
use crate::errors::{PipelineError, Result};
use crate::schemas::{
    ConversionInput, DocumentUpload, KycSubmission, PipelineConfig, Prospect, ProspectSource,
    ProspectStatus,
};
use crate::store::ProspectStore;

use super::outcome::{ConversionOutcome, EmailDelivery, NewProspect, TransitionOutcome};

pub struct Pipeline {
    store: Arc<dyn ProspectStore>,
    email: Arc<dyn EmailService>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Pipeline with the system clock and random UUIDs
    pub fn new(
        store: Arc<dyn ProspectStore>,
        email: Arc<dyn EmailService>,
        config: PipelineConfig,
    ) -> Self {
        Pipeline {
            store,
            email,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ===== QUERIES =====

    pub async fn get(&self, id: &str) -> Result<Prospect> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("prospect {}", id)))
    }

    pub async fn list(&self, fund_id: Option<&str>) -> Result<Vec<Prospect>> {
        self.store.list(fund_id).await
    }

    // ===== ENTRY =====

    /// Manager invitation: creates the prospect and sends the KYC invitation
    pub async fn invite(&self, request: NewProspect) -> Result<TransitionOutcome> {
        let prospect = self.create(request, ProspectSource::ManagerInvite).await?;
        let ctx = EmailContext::new(&prospect, &self.config);
        match decide_invitation(&ctx) {
            Some(intent) => self.deliver(prospect, intent).await,
            None => Ok(TransitionOutcome {
                prospect,
                email: EmailDelivery::NotRequired,
            }),
        }
    }

    /// Public self-registration; submits the questionnaire right away when answers are given
    pub async fn register(
        &self,
        request: NewProspect,
        kyc: Option<KycSubmission>,
    ) -> Result<TransitionOutcome> {
        let prospect = self.create(request, ProspectSource::SelfRegistration).await?;
        match kyc {
            Some(kyc) => self.submit_kyc(&prospect.id, kyc).await,
            None => Ok(TransitionOutcome {
                prospect,
                email: EmailDelivery::NotRequired,
            }),
        }
    }

    async fn create(&self, request: NewProspect, source: ProspectSource) -> Result<Prospect> {
        let email = normalize_email(&request.email)?;
        let fund_id = request
            .fund_id
            .unwrap_or_else(|| self.config.fund_id.clone());

        if self.store.find_by_email(&email, &fund_id).await?.is_some() {
            return Err(PipelineError::DuplicateProspect { email, fund_id });
        }

        let mut prospect = Prospect::new(
            self.ids.generate(),
            fund_id,
            email,
            request.identity,
            source,
            self.clock.now(),
        );
        prospect.investor_type = request.investor_type;
        prospect.phone = request.phone;
        prospect.notes = request.notes;

        self.store.insert(&prospect).await?;
        info!(
            prospect_id = %prospect.id,
            fund_id = %prospect.fund_id,
            source = ?source,
            "prospect created"
        );
        Ok(prospect)
    }

    // ===== TRANSITIONS =====

    /// Move a prospect to `requested`, carrying whatever the target status needs
    pub async fn transition(
        &self,
        id: &str,
        requested: ProspectStatus,
        fields: TransitionFields,
    ) -> Result<TransitionOutcome> {
        let current = self.get(id).await?;
        let next = apply_transition(&current, requested, fields, self.clock.now())?;
        self.commit(current, next).await
    }

    /// Take the single forward step from the current status.
    ///
    /// documents_pending has two outcomes and needs an explicit review command.
    pub async fn advance(&self, id: &str) -> Result<TransitionOutcome> {
        let current = self.get(id).await?;
        let requested = get_next_state(current.status).ok_or_else(|| {
            PipelineError::Validation(format!(
                "{} has no single next status; use the specific command",
                current.status
            ))
        })?;
        let next = apply_transition(&current, requested, TransitionFields::default(), self.clock.now())?;
        self.commit(current, next).await
    }

    pub async fn submit_kyc(&self, id: &str, kyc: KycSubmission) -> Result<TransitionOutcome> {
        self.transition(
            id,
            ProspectStatus::KycSubmitted,
            TransitionFields::default().with_kyc(kyc),
        )
        .await
    }

    /// Manager review of the KYC answers; `bases` add to those the prospect declared
    pub async fn pre_qualify(&self, id: &str, bases: Vec<String>) -> Result<TransitionOutcome> {
        self.transition(
            id,
            ProspectStatus::PreQualified,
            TransitionFields::default().with_accreditation_bases(bases),
        )
        .await
    }

    pub async fn disqualify(&self, id: &str, notes: Option<String>) -> Result<TransitionOutcome> {
        let mut fields = TransitionFields::default();
        if let Some(notes) = notes {
            fields = fields.with_notes(notes);
        }
        self.transition(id, ProspectStatus::NotEligible, fields).await
    }

    pub async fn schedule_meeting(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::MeetingScheduled, TransitionFields::default())
            .await
    }

    pub async fn complete_meeting(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::MeetingComplete, TransitionFields::default())
            .await
    }

    pub async fn send_account_invite(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::AccountInviteSent, TransitionFields::default())
            .await
    }

    pub async fn mark_account_created(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::AccountCreated, TransitionFields::default())
            .await
    }

    pub async fn submit_onboarding(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::OnboardingSubmitted, TransitionFields::default())
            .await
    }

    /// Upload a document set, first time or after a rejection
    pub async fn upload_documents(
        &self,
        id: &str,
        uploads: Vec<DocumentUpload>,
    ) -> Result<TransitionOutcome> {
        let current = self.get(id).await?;
        let uploads = uploads
            .into_iter()
            .map(|upload| (self.ids.generate(), upload))
            .collect();
        let next = domain::submit_documents(&current, uploads, self.clock.now())?;
        self.commit(current, next).await
    }

    pub async fn approve_documents(&self, id: &str) -> Result<TransitionOutcome> {
        let current = self.get(id).await?;
        let next = domain::approve_documents(&current, self.clock.now())?;
        self.commit(current, next).await
    }

    pub async fn reject_documents(&self, id: &str, reason: &str) -> Result<TransitionOutcome> {
        let current = self.get(id).await?;
        let next = domain::reject_documents(&current, reason, self.clock.now())?;
        self.commit(current, next).await
    }

    pub async fn send_docusign(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::DocusignSent, TransitionFields::default())
            .await
    }

    pub async fn mark_docusign_signed(&self, id: &str) -> Result<TransitionOutcome> {
        self.transition(id, ProspectStatus::DocusignSigned, TransitionFields::default())
            .await
    }

    /// Create the investor and seal the prospect as converted, atomically
    pub async fn convert_to_investor(
        &self,
        id: &str,
        input: ConversionInput,
    ) -> Result<ConversionOutcome> {
        let current = self.get(id).await?;
        let now = self.clock.now();
        let investor_id = self.ids.generate();

        let draft = domain::prepare_investor_conversion(&current, &input, &investor_id, now)?;
        let converted = domain::complete_conversion(&current, &investor_id, now)?;

        let investor = self
            .store
            .create_investor_from_prospect(&draft, &converted)
            .await
            .map_err(|e| self.on_conflict(e, &current))?;
        info!(
            prospect_id = %current.id,
            investor_id = %investor.id,
            commitment = %investor.commitment_amount,
            "prospect converted"
        );

        // Terminal now, so only the email log can change after this read
        let converted = self.get(&converted.id).await?;
        let outcome = self.notify(current.status, converted).await?;
        Ok(ConversionOutcome {
            prospect: outcome.prospect,
            investor,
            email: outcome.email,
        })
    }

    // ===== EMAIL =====

    /// Send a reminder for the status the prospect is waiting in
    pub async fn send_reminder(&self, id: &str, kind: ReminderKind) -> Result<TransitionOutcome> {
        let prospect = self.get(id).await?;
        let intent = decide_reminder(kind, &EmailContext::new(&prospect, &self.config))?;
        self.deliver(prospect, intent).await
    }

    /// Retry an email whose delivery failed.
    ///
    /// Skipped when the decision point was answered meanwhile or the prospect
    /// has left the pipeline. Nothing is committed here, so a repeated failure
    /// is returned as `PipelineError::Email`.
    pub async fn redeliver(&self, intent: EmailIntent) -> Result<TransitionOutcome> {
        let prospect = self.get(&intent.prospect_id).await?;
        if is_suppressed(&intent, &prospect) {
            debug!(
                prospect_id = %prospect.id,
                template = %intent.template,
                "redelivery skipped"
            );
            return Ok(TransitionOutcome {
                prospect,
                email: EmailDelivery::NotRequired,
            });
        }
        let outcome = self.deliver(prospect, intent).await?;
        match outcome.email {
            EmailDelivery::Failed { error, .. } => Err(PipelineError::Email(error)),
            _ => Ok(outcome),
        }
    }

    // ===== INTERNALS =====

    /// Write `next` over the `current` it was computed from, then notify
    /// from the committed record so suppression sees the full email log
    async fn commit(&self, current: Prospect, next: Prospect) -> Result<TransitionOutcome> {
        let committed = self
            .store
            .update_status(&next, current.status)
            .await
            .map_err(|e| self.on_conflict(e, &current))?;
        info!(
            prospect_id = %committed.id,
            from = %current.status,
            to = %committed.status,
            version = committed.version,
            "prospect transitioned"
        );
        self.notify(current.status, committed).await
    }

    fn on_conflict(&self, error: PipelineError, current: &Prospect) -> PipelineError {
        if let PipelineError::ConcurrentModification {
            actual,
            actual_version,
            ..
        } = &error
        {
            warn!(
                prospect_id = %current.id,
                expected = %current.status,
                expected_version = current.version,
                actual = %actual,
                actual_version = *actual_version,
                "write lost to a concurrent change; request rejected"
            );
        }
        error
    }

    async fn notify(&self, previous: ProspectStatus, prospect: Prospect) -> Result<TransitionOutcome> {
        let intent = decide_email(
            previous,
            prospect.status,
            &EmailContext::new(&prospect, &self.config),
        );
        match intent {
            Some(intent) => self.deliver(prospect, intent).await,
            None => Ok(TransitionOutcome {
                prospect,
                email: EmailDelivery::NotRequired,
            }),
        }
    }

    async fn deliver(&self, prospect: Prospect, intent: EmailIntent) -> Result<TransitionOutcome> {
        let template = intent.template;
        match self
            .email
            .send(template, &intent.recipient, &intent.variables)
            .await
        {
            Ok(()) => {
                info!(prospect_id = %prospect.id, template = %template, "email sent");
                let logged = self
                    .store
                    .record_email(&prospect.id, intent.log_entry(self.clock.now()))
                    .await;
                let prospect = match logged {
                    Ok(updated) => updated,
                    Err(e) => {
                        warn!(
                            prospect_id = %prospect.id,
                            template = %template,
                            error = %e,
                            "email sent but not recorded"
                        );
                        prospect
                    }
                };
                Ok(TransitionOutcome {
                    prospect,
                    email: EmailDelivery::Sent(template),
                })
            }
            Err(error) => {
                warn!(
                    prospect_id = %prospect.id,
                    template = %template,
                    error = %error,
                    "email delivery failed; change stays committed"
                );
                Ok(TransitionOutcome {
                    prospect,
                    email: EmailDelivery::Failed {
                        intent: Box::new(intent),
                        error,
                    },
                })
            }
        }
    }
}
