//! Request stores backing the workflow handlers.
//!
//! [`MemoryStore`] keeps everything in process and is what the tests run on.
//! [`SqliteStore`] persists to SQLite and is available with the `database`
//! feature.

pub mod memory;
#[cfg(feature = "database")]
pub mod sqlite;

pub use memory::MemoryStore;
#[cfg(feature = "database")]
pub use sqlite::SqliteStore;

use chrono::{DateTime, Duration, Utc};

use crate::models::{SystemIntake, SystemIntakeMetrics, SystemIntakeStatus};

fn in_window(at: Option<DateTime<Utc>>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    at.is_some_and(|at| at >= start && at < end)
}

fn submitted_within(intake: &SystemIntake, days: i64) -> bool {
    match (intake.created_at, intake.submitted_at) {
        (Some(created), Some(submitted)) => submitted - created <= Duration::days(days),
        _ => false,
    }
}

/// Count intake throughput for `[start, end)`.
///
/// An intake counts as started when it was created in the window and as
/// completed when it was submitted in the window. Funded intakes are
/// completed ones that have reached `LCID_ISSUED`.
pub(crate) fn tally_intake_metrics<'a>(
    intakes: impl IntoIterator<Item = &'a SystemIntake>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> SystemIntakeMetrics {
    let mut metrics = SystemIntakeMetrics::default();

    for intake in intakes {
        if in_window(intake.created_at, start, end) {
            metrics.started += 1;
            if intake.submitted_at.is_some() {
                metrics.completed_of_started += 1;
            }
        }
        if in_window(intake.submitted_at, start, end) {
            metrics.completed += 1;
            if submitted_within(intake, 5) {
                metrics.completed_within_five_days += 1;
            }
            if submitted_within(intake, 30) {
                metrics.completed_within_thirty_days += 1;
            }
            if intake.status == SystemIntakeStatus::LcidIssued {
                metrics.funded += 1;
            }
        }
    }

    metrics
}
