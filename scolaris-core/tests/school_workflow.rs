/*
    school_workflow.rs - Student and finance lists over a degraded remote

    The remote is scripted to fail part way through the year, so writes land
    in the local store while the manager keeps its origin flag.
*/

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use scolaris_core::config::Config;
use scolaris_core::models::{EnrollmentStatus, Fee, FinanceSummary, Payment, Student};
use scolaris_core::sources::{self, FallbackSource, MemorySource};
use scolaris_core::sync::{Fetched, ListManager, Patch, SourceError, Synced};
use scolaris_core::test_utils::{assert_ids, student, ScriptedSource, TestStudentBuilder};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Test 3.1: Remote answers the fetch, then goes away
#[tokio::test]
async fn test_origin_flag_survives_remote_outage() {
    let remote = Arc::new(ScriptedSource::<Student>::new());
    remote.on_fetch(Ok(Fetched::new(vec![student(1, "Awa", "Diallo")], true)));
    remote.on_create(Err(SourceError::remote("502 bad gateway")));
    remote.on_update(Err(SourceError::remote("502 bad gateway")));

    let local = MemorySource::with_items(vec![student(1, "Awa", "Diallo")]).unwrap();
    let manager = ListManager::new(FallbackSource::new(Arc::clone(&remote), local));
    manager.wait_ready().await;
    assert!(manager.from_api());

    let moussa = manager
        .create_item(Student::inscription("Moussa", "Sow", date(2013, 11, 20), "CM2", "2025-2026", "Aminata Sow"))
        .await
        .unwrap();
    assert_eq!(moussa.id, 2);

    let awa = manager.update_item(1, Student::reinscription("2026-2027", "CM1")).await.unwrap();
    assert_eq!(awa.status, EnrollmentStatus::Reenrolled);

    assert_ids(&manager.items(), &[1, 2]);
    assert_eq!(manager.get(1).unwrap().school_year, "2026-2027");
    // Local answers never lower the flag
    assert!(manager.from_api());
}

/// Test 3.2: Seeded local store through configuration
#[tokio::test]
async fn test_seeded_fallback_from_config() {
    let seeded = vec![
        TestStudentBuilder::new(4, "Ibrahima", "Ba").with_class("CP").build(),
        TestStudentBuilder::new(9, "Khady", "Ndiaye").with_phone("+221 70 111 22 33").build(),
    ];
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    write!(seed, "{}", serde_json::to_string(&seeded).unwrap()).unwrap();
    let seed_path = seed.path().display().to_string();

    let config = Config::default()
        .with_overrides(|key: &str| match key {
            "SCOLARIS_SOURCE_SEED_PATH" => Some(seed_path.clone()),
            "SCOLARIS_SOURCE_FALLBACK" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();

    let remote = ScriptedSource::<Student>::new();
    remote.on_fetch(Err(SourceError::remote("offline")));

    let manager = ListManager::new(sources::from_config(remote, &config.source).unwrap());
    manager.wait_ready().await;

    assert_eq!(manager.items(), seeded);
    assert!(!manager.from_api());

    // Local ids continue after the seeded ones
    let created = manager
        .create_item(Student::inscription("Awa", "Diallo", date(2014, 3, 2), "CM1", "2025-2026", "Fatou Diallo"))
        .await
        .unwrap();
    assert_eq!(created.id, 10);
}

/// Test 3.3: Finance dashboard over two managers
#[tokio::test]
async fn test_finance_summary_from_managers() {
    let fees = ListManager::new(MemorySource::<Fee>::new().reporting_from_api(true));
    let payments = ListManager::new(MemorySource::<Payment>::new().reporting_from_api(true));
    fees.wait_ready().await;
    payments.wait_ready().await;

    let tuition = fees
        .create_item(
            Patch::new()
                .set("student_id", 1)
                .set("label", "Tuition")
                .set("amount_cents", 120_000)
                .set("due_date", "2025-10-01"),
        )
        .await
        .unwrap();

    let payment = payments
        .create_item(
            Patch::new()
                .set("fee_id", tuition.id)
                .set("amount_cents", 50_000)
                .set("paid_on", "2025-09-20")
                .set("method", "cash"),
        )
        .await
        .unwrap();

    let summary = FinanceSummary::compute(&fees.items(), &payments.items(), &[], date(2025, 10, 15));
    assert_eq!(summary.outstanding_for(1), 70_000);
    assert_eq!(summary.overdue().count(), 1);

    // Correct the amount; the summary follows the manager
    payments
        .update_item(payment.id, Patch::new().set("amount_cents", 120_000))
        .await
        .unwrap();
    let summary = FinanceSummary::compute(&fees.items(), &payments.items(), &[], date(2025, 10, 15));
    assert_eq!(summary.outstanding_cents, 0);
    assert!(summary.open_fees.is_empty());
}

/// Test 3.4: Withdrawal then removal of the record
#[tokio::test]
async fn test_withdraw_then_delete() {
    let remote = Arc::new(ScriptedSource::<Student>::new());
    let awa = student(1, "Awa", "Diallo");
    let withdrawn = Student::withdrawal().apply_to(&awa).unwrap();
    remote.on_fetch(Ok(Fetched::new(vec![awa, student(2, "Moussa", "Sow")], true)));
    remote.on_update(Ok(Synced::new(withdrawn.clone(), true)));
    remote.on_delete(Ok(()));

    let manager = ListManager::new(Arc::clone(&remote));
    manager.wait_ready().await;

    manager.update_item(1, Student::withdrawal()).await.unwrap();
    assert!(!manager.get(1).unwrap().is_active());

    manager.delete_item(1).await.unwrap();
    assert_ids(&manager.items(), &[2]);
}
