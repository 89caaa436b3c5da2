use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::errors::ErrorKind;

/// Workflow action counters
#[derive(Debug, Default)]
pub struct WorkflowMetrics {
    pub dispatched: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub notification_failures: AtomicU64,
    failures_by_kind: Mutex<HashMap<ErrorKind, u64>>,
}

impl WorkflowMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        let mut by_kind = self
            .failures_by_kind
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *by_kind.entry(kind).or_insert(0) += 1;
    }

    /// A best-effort email that did not go out
    pub fn record_notification_failure(&self) {
        self.notification_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> WorkflowStats {
        let failures_by_kind = self
            .failures_by_kind
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(kind, count)| (kind.as_str(), *count))
            .collect();
        WorkflowStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            notification_failures: self.notification_failures.load(Ordering::Relaxed),
            failures_by_kind,
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Workflow metrics: dispatched={}, succeeded={}, failed={}, notification_failures={}",
            stats.dispatched, stats.succeeded, stats.failed, stats.notification_failures
        );
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowStats {
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub notification_failures: u64,
    pub failures_by_kind: HashMap<&'static str, u64>,
}

/// Global metrics instance
static WORKFLOW_METRICS: std::sync::LazyLock<WorkflowMetrics> =
    std::sync::LazyLock::new(WorkflowMetrics::new);

pub fn workflow_metrics() -> &'static WorkflowMetrics {
    &WORKFLOW_METRICS
}

/// Span wrapping one dispatched action
pub fn create_action_span(
    action_type: &str,
    intake_id: Option<Uuid>,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "workflow_action",
        action_type = action_type,
        intake.id = %intake_id.map(|id| id.to_string()).unwrap_or_default(),
        correlation.id = correlation_id
    )
}
