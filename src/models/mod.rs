// Domain records for governance requests and their audit trail

pub mod accessibility;
pub mod action;
pub mod business_case;
pub mod intake;
pub mod metrics;
pub mod user;

pub use accessibility::{AccessibilityRequest, AccessibilityRequestDocument, DocumentStatus};
pub use action::{Action, ActionType};
pub use business_case::{
    BusinessCase, BusinessCaseStatus, EstimatedLifecycleCost, LifecycleCostPhase,
    LifecycleCostSolution, LifecycleCostYear,
};
pub use intake::{SystemIntake, SystemIntakeRequestType, SystemIntakeStatus};
pub use metrics::{MetricsDigest, SystemIntakeMetrics};
pub use user::UserInfo;

/// Error returned when a stored enum value cannot be parsed back
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
