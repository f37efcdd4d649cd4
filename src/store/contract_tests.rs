//! Behaviour every store must share, run against both implementations

use chrono::{Duration, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::TempDir;

use super::*;
use crate::domain::{
    apply_transition, approve_documents, complete_conversion, prepare_investor_conversion,
    reject_documents, submit_documents, TransitionFields,
};
use crate::schemas::{
    ConversionInput, DocumentKind, DocumentUpload, EmailTemplate, Identity, ProspectSource,
    SuppressionClass,
};

fn make_prospect(id: &str, email: &str) -> Prospect {
    Prospect::new(
        id.to_string(),
        "fund-a".to_string(),
        email.to_string(),
        Identity::Entity {
            legal_name: Some("Lovelace Capital LLC".to_string()),
            signatory_name: Some("Ada Lovelace".to_string()),
        },
        ProspectSource::ManagerInvite,
        Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
    )
}

fn log_entry(template: EmailTemplate, class: SuppressionClass) -> EmailLogEntry {
    EmailLogEntry {
        template,
        class,
        cycle: 0,
        sent_at: Utc::now(),
    }
}

async fn check_insert_and_find(store: &dyn ProspectStore) {
    let prospect = make_prospect("p-1", "ada@example.com");
    store.insert(&prospect).await.unwrap();

    let found = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(found, prospect);
    assert!(store.find_by_id("p-404").await.unwrap().is_none());

    let by_email = store.find_by_email("ada@example.com", "fund-a").await.unwrap();
    assert_eq!(by_email.map(|p| p.id), Some("p-1".to_string()));
    assert!(store
        .find_by_email("ada@example.com", "fund-b")
        .await
        .unwrap()
        .is_none());
}

async fn check_duplicate_email(store: &dyn ProspectStore) {
    store.insert(&make_prospect("p-1", "ada@example.com")).await.unwrap();
    let result = store.insert(&make_prospect("p-2", "ada@example.com")).await;
    assert!(matches!(result, Err(PipelineError::DuplicateProspect { .. })));

    let mut other_fund = make_prospect("p-3", "ada@example.com");
    other_fund.fund_id = "fund-b".to_string();
    store.insert(&other_fund).await.unwrap();
}

async fn check_list_order_and_filter(store: &dyn ProspectStore) {
    let mut later = make_prospect("p-b", "b@example.com");
    later.created_at += Duration::minutes(5);
    let earlier = make_prospect("p-a", "a@example.com");
    let mut elsewhere = make_prospect("p-c", "c@example.com");
    elsewhere.fund_id = "fund-b".to_string();
    for prospect in [&later, &earlier, &elsewhere] {
        store.insert(prospect).await.unwrap();
    }

    let ids: Vec<_> = store
        .list(Some("fund-a"))
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec!["p-a", "p-b"]);
    assert_eq!(store.list(None).await.unwrap().len(), 3);
}

async fn check_optimistic_update(store: &dyn ProspectStore) {
    let prospect = make_prospect("p-1", "ada@example.com");
    store.insert(&prospect).await.unwrap();

    let submitted = apply_transition(
        &prospect,
        ProspectStatus::KycSubmitted,
        TransitionFields::default(),
        Utc::now(),
    )
    .unwrap();
    store.update_status(&submitted, ProspectStatus::KycSent).await.unwrap();

    // A second writer that read kyc_sent loses
    let stale = apply_transition(
        &prospect,
        ProspectStatus::NotEligible,
        TransitionFields::default(),
        Utc::now(),
    )
    .unwrap();
    let result = store.update_status(&stale, ProspectStatus::KycSent).await;
    assert!(matches!(
        result,
        Err(PipelineError::ConcurrentModification {
            expected: ProspectStatus::KycSent,
            actual: ProspectStatus::KycSubmitted,
            ..
        })
    ));

    let stored = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored.status, ProspectStatus::KycSubmitted);
}

async fn check_update_missing(store: &dyn ProspectStore) {
    let prospect = make_prospect("p-9", "ghost@example.com");
    let result = store.update_status(&prospect, ProspectStatus::KycSent).await;
    assert!(matches!(result, Err(PipelineError::NotFound(_))));
}

async fn check_email_log_survives_status_writes(store: &dyn ProspectStore) {
    let prospect = make_prospect("p-1", "ada@example.com");
    store.insert(&prospect).await.unwrap();

    let logged = store
        .record_email(
            "p-1",
            log_entry(EmailTemplate::KycInvitation, SuppressionClass::Invitation),
        )
        .await
        .unwrap();
    assert_eq!(logged.email_log.len(), 1);

    // Snapshot taken before the email was logged
    let submitted = apply_transition(
        &prospect,
        ProspectStatus::KycSubmitted,
        TransitionFields::default(),
        Utc::now(),
    )
    .unwrap();
    store.update_status(&submitted, ProspectStatus::KycSent).await.unwrap();

    let stored = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored.status, ProspectStatus::KycSubmitted);
    assert_eq!(stored.email_log.len(), 1);
    assert_eq!(stored.email_log[0].template, EmailTemplate::KycInvitation);
}

async fn check_conversion_is_atomic(store: &dyn ProspectStore) {
    let mut prospect = make_prospect("p-1", "ada@example.com");
    prospect.status = ProspectStatus::DocusignSigned;
    store.insert(&prospect).await.unwrap();

    let now = Utc::now();
    let input = ConversionInput {
        commitment_amount: dec!(500000),
    };
    let draft = prepare_investor_conversion(&prospect, &input, "inv-1", now).unwrap();
    let converted = complete_conversion(&prospect, "inv-1", now).unwrap();

    let investor = store
        .create_investor_from_prospect(&draft, &converted)
        .await
        .unwrap();
    assert_eq!(investor.prospect_id, "p-1");
    assert_eq!(store.find_investor("inv-1").await.unwrap(), Some(investor));

    let stored = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored.status, ProspectStatus::Converted);
    assert_eq!(stored.investor_id.as_deref(), Some("inv-1"));

    // A competing conversion computed from the same snapshot writes nothing
    let draft2 = prepare_investor_conversion(&prospect, &input, "inv-2", now).unwrap();
    let converted2 = complete_conversion(&prospect, "inv-2", now).unwrap();
    let result = store.create_investor_from_prospect(&draft2, &converted2).await;
    assert!(matches!(
        result,
        Err(PipelineError::ConcurrentModification {
            actual: ProspectStatus::Converted,
            ..
        })
    ));
    assert!(store.find_investor("inv-2").await.unwrap().is_none());
    let stored = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored.investor_id.as_deref(), Some("inv-1"));
}

async fn check_conversion_requires_matching_records(store: &dyn ProspectStore) {
    let mut prospect = make_prospect("p-1", "ada@example.com");
    prospect.status = ProspectStatus::DocusignSigned;
    store.insert(&prospect).await.unwrap();

    let now = Utc::now();
    let input = ConversionInput {
        commitment_amount: dec!(1),
    };
    let draft = prepare_investor_conversion(&prospect, &input, "inv-1", now).unwrap();
    // Prospect not actually converted
    let result = store.create_investor_from_prospect(&draft, &prospect).await;
    assert!(matches!(result, Err(PipelineError::Validation(_))));
    assert!(store.find_investor("inv-1").await.unwrap().is_none());
}

async fn check_record_email_missing(store: &dyn ProspectStore) {
    let result = store
        .record_email(
            "p-404",
            log_entry(EmailTemplate::KycReminder, SuppressionClass::Reminder),
        )
        .await;
    assert!(matches!(result, Err(PipelineError::NotFound(_))));
}

fn scan(id: &str, file_name: &str) -> Vec<(String, DocumentUpload)> {
    vec![(
        id.to_string(),
        DocumentUpload::new(DocumentKind::Identity, file_name),
    )]
}

async fn check_writes_bump_version(store: &dyn ProspectStore) {
    let prospect = make_prospect("p-1", "ada@example.com");
    store.insert(&prospect).await.unwrap();
    assert_eq!(prospect.version, 0);

    let submitted = apply_transition(
        &prospect,
        ProspectStatus::KycSubmitted,
        TransitionFields::default(),
        Utc::now(),
    )
    .unwrap();
    let committed = store
        .update_status(&submitted, ProspectStatus::KycSent)
        .await
        .unwrap();
    assert_eq!(committed.version, 1);
    assert_eq!(store.find_by_id("p-1").await.unwrap().unwrap(), committed);

    // Appending to the email log is not a state change
    let logged = store
        .record_email(
            "p-1",
            log_entry(EmailTemplate::KycReminder, SuppressionClass::Reminder),
        )
        .await
        .unwrap();
    assert_eq!(logged.version, 1);
}

async fn check_stale_copy_after_status_round_trip(store: &dyn ProspectStore) {
    let mut prospect = make_prospect("p-1", "ada@example.com");
    prospect.status = ProspectStatus::OnboardingSubmitted;
    store.insert(&prospect).await.unwrap();
    let now = Utc::now();

    let pending = submit_documents(&prospect, scan("d-1", "blurry.jpg"), now).unwrap();
    let snapshot = store
        .update_status(&pending, ProspectStatus::OnboardingSubmitted)
        .await
        .unwrap();

    // Another writer rejects and the prospect re-uploads: back to documents_pending
    let rejected = reject_documents(&snapshot, "blurry scan", now).unwrap();
    let rejected = store
        .update_status(&rejected, ProspectStatus::DocumentsPending)
        .await
        .unwrap();
    let resubmitted = submit_documents(&rejected, scan("d-2", "sharp.pdf"), now).unwrap();
    store
        .update_status(&resubmitted, ProspectStatus::DocumentsRejected)
        .await
        .unwrap();

    // An approval computed from the first snapshot must not land
    let stale = approve_documents(&snapshot, now).unwrap();
    let result = store
        .update_status(&stale, ProspectStatus::DocumentsPending)
        .await;
    assert!(matches!(
        result,
        Err(PipelineError::ConcurrentModification {
            expected: ProspectStatus::DocumentsPending,
            actual: ProspectStatus::DocumentsPending,
            expected_version: 1,
            actual_version: 3,
            ..
        })
    ));

    let stored = store.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored.status, ProspectStatus::DocumentsPending);
    assert_eq!(stored.document_cycle, 2);
    assert_eq!(stored.documents.len(), 2);
    assert!(stored.stages.documents_rejected_at.is_some());
    assert_eq!(stored.document_rejection_reason.as_deref(), Some("blurry scan"));
}

async fn check_conversion_from_stale_copy(store: &dyn ProspectStore) {
    let mut prospect = make_prospect("p-1", "ada@example.com");
    prospect.status = ProspectStatus::DocusignSigned;
    prospect.version = 4;
    store.insert(&prospect).await.unwrap();

    let now = Utc::now();
    let input = ConversionInput {
        commitment_amount: dec!(250000),
    };
    let mut stale = prospect.clone();
    stale.version = 3;
    let draft = prepare_investor_conversion(&stale, &input, "inv-1", now).unwrap();
    let converted = complete_conversion(&stale, "inv-1", now).unwrap();

    let result = store.create_investor_from_prospect(&draft, &converted).await;
    assert!(matches!(
        result,
        Err(PipelineError::ConcurrentModification {
            expected_version: 3,
            actual_version: 4,
            ..
        })
    ));
    assert!(store.find_investor("inv-1").await.unwrap().is_none());

    let converted = complete_conversion(&prospect, "inv-1", now).unwrap();
    store
        .create_investor_from_prospect(&draft, &converted)
        .await
        .unwrap();
    assert_eq!(store.find_by_id("p-1").await.unwrap().unwrap().version, 5);
}

macro_rules! store_contract {
    ($($name:ident),* $(,)?) => {
        mod in_memory {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    let store = InMemoryProspectStore::new();
                    super::$name(&store).await;
                }
            )*
        }

        mod json_files {
            use super::*;
            $(
                #[tokio::test]
                async fn $name() {
                    let temp = TempDir::new().unwrap();
                    let store = JsonProspectStore::new(temp.path());
                    super::$name(&store).await;
                }
            )*
        }
    };
}

store_contract!(
    check_insert_and_find,
    check_duplicate_email,
    check_list_order_and_filter,
    check_optimistic_update,
    check_update_missing,
    check_email_log_survives_status_writes,
    check_conversion_is_atomic,
    check_conversion_requires_matching_records,
    check_record_email_missing,
    check_writes_bump_version,
    check_stale_copy_after_status_round_trip,
    check_conversion_from_stale_copy,
);

#[test]
fn test_json_store_reads_what_another_instance_wrote() {
    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let writer = JsonProspectStore::new(temp.path());
        writer.insert(&make_prospect("p-1", "ada@example.com")).await.unwrap();

        let reader = JsonProspectStore::new(temp.path());
        assert!(reader.find_by_id("p-1").await.unwrap().is_some());
        assert_eq!(reader.root(), temp.path());
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_json_store_instances_race_on_one_record() {
    let temp = TempDir::new().unwrap();
    let mut prospect = make_prospect("p-1", "ada@example.com");
    prospect.status = ProspectStatus::OnboardingSubmitted;
    let setup = JsonProspectStore::new(temp.path());
    setup.insert(&prospect).await.unwrap();
    let pending = submit_documents(&prospect, scan("d-1", "passport.pdf"), Utc::now()).unwrap();
    let snapshot = setup
        .update_status(&pending, ProspectStatus::OnboardingSubmitted)
        .await
        .unwrap();

    // One store instance per writer, as separate CLI processes would have
    let approve = approve_documents(&snapshot, Utc::now()).unwrap();
    let reject = reject_documents(&snapshot, "expired passport", Utc::now()).unwrap();
    let mut handles = Vec::new();
    for next in [approve, reject] {
        let root = temp.path().to_path_buf();
        handles.push(tokio::spawn(async move {
            let store = JsonProspectStore::new(root);
            let result = store
                .update_status(&next, ProspectStatus::DocumentsPending)
                .await;
            result
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(committed) => winners.push(committed),
            Err(PipelineError::ConcurrentModification { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners.len(), 1);
    let stored = setup.find_by_id("p-1").await.unwrap().unwrap();
    assert_eq!(stored, winners[0]);
    assert_eq!(stored.version, 2);
}
