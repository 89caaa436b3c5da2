use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intake throughput over a reporting window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemIntakeMetrics {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Intakes created in the window
    pub started: u64,
    /// Intakes created in the window that were also submitted
    pub completed_of_started: u64,
    /// Intakes submitted in the window
    pub completed: u64,
    pub completed_within_five_days: u64,
    pub completed_within_thirty_days: u64,
    /// Submitted intakes that reached an issued lifecycle ID
    pub funded: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsDigest {
    pub system_intake_metrics: SystemIntakeMetrics,
}
