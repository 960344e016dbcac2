//! Walk a school year through the list managers
//!
//! The remote API is unreachable here, so student writes fall back to the
//! local store configured through `SCOLARIS_SOURCE_*`.
//!
//! Run with:
//! ```bash
//! SCOLARIS_LOG_LEVEL=debug cargo run --example enrollment_demo
//! ```

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use scolaris_core::config::Config;
use scolaris_core::logging::init_logging_with_config;
use scolaris_core::metrics::init_metrics;
use scolaris_core::models::{Fee, FinanceSummary, Payment, PaymentMethod, Student};
use scolaris_core::sources::{self, MemorySource};
use scolaris_core::sync::{
    DataSource, Entity, EntityId, Fetched, ListManager, Patch, SourceError, SourceResult, Synced,
};
use tracing::info;

/// Remote API that never answers
struct OfflineApi;

#[async_trait]
impl<T: Entity> DataSource<T> for OfflineApi {
    async fn fetch_all(&self) -> SourceResult<Fetched<T>> {
        Err(SourceError::remote("connection refused"))
    }

    async fn create(&self, _fields: Patch<T>) -> SourceResult<Synced<T>> {
        Err(SourceError::remote("connection refused"))
    }

    async fn update_by_id(&self, _id: EntityId, _fields: Patch<T>) -> SourceResult<Synced<T>> {
        Err(SourceError::remote("connection refused"))
    }

    async fn delete_by_id(&self, _id: EntityId) -> SourceResult<()> {
        Err(SourceError::remote("connection refused"))
    }
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging_with_config(config.logging.to_log_config())?;
    init_metrics();

    let students: ListManager<Student> =
        ListManager::new(sources::from_config(OfflineApi, &config.source)?);
    info!(phase = ?students.wait_ready().await, count = students.len(), "Students loaded");

    let awa = students
        .create_item(Student::inscription("Awa", "Diallo", date(2014, 3, 2)?, "CM1", "2025-2026", "Fatou Diallo"))
        .await?;
    let moussa = students
        .create_item(Student::inscription("Moussa", "Sow", date(2013, 11, 20)?, "CM2", "2025-2026", "Aminata Sow"))
        .await?;

    students.update_item(awa.id, Student::reinscription("2026-2027", "CM2")).await?;
    students.update_item(moussa.id, Student::withdrawal()).await?;

    for student in students.items() {
        info!(id = student.id, name = %student.full_name(), status = ?student.status, active = student.is_active(), "Student");
    }
    info!(from_api = students.from_api(), "Student list origin");

    let fees = ListManager::new(MemorySource::<Fee>::new().reporting_from_api(true));
    let payments = ListManager::new(MemorySource::<Payment>::new().reporting_from_api(true));
    fees.wait_ready().await;
    payments.wait_ready().await;

    for student in [&awa, &moussa] {
        let fee = fees
            .create_item(
                Patch::new()
                    .set("student_id", student.id)
                    .set("label", "Tuition 2025-2026")
                    .set("amount_cents", 150_000)
                    .set("due_date", "2025-10-01"),
            )
            .await?;

        payments
            .create_item(
                Patch::new()
                    .set("fee_id", fee.id)
                    .set("amount_cents", 100_000)
                    .set("paid_on", "2025-09-15")
                    .set_serialized("method", &PaymentMethod::MobileMoney)?,
            )
            .await?;
    }

    let summary = FinanceSummary::compute(&fees.items(), &payments.items(), &[], date(2025, 10, 15)?);
    info!(
        billed = summary.billed_cents,
        collected = summary.collected_cents,
        outstanding = summary.outstanding_cents,
        overdue = summary.overdue().count(),
        "Finance summary"
    );

    Ok(())
}
