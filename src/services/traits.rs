// Collaborator interfaces the workflow handlers are built from.
//
// Every external dependency (store, directory, system of record, email) sits
// behind one of these so handlers can be assembled with real or mock parts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::context::RequestContext;
use crate::errors::{NotificationError, StoreError, ValidationError, WorkflowError};
use crate::models::{
    Action, BusinessCase, SystemIntake, SystemIntakeMetrics, SystemIntakeStatus, UserInfo,
};
use crate::services::templates::ReviewEmail;

/// Persistence for system intakes
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait IntakeStore: Send + Sync {
    async fn fetch_system_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError>;

    /// Save `intake` only if the stored status still equals `expected_status`
    async fn update_system_intake(
        &self,
        intake: &SystemIntake,
        expected_status: SystemIntakeStatus,
    ) -> Result<SystemIntake, StoreError>;
}

/// Persistence for business cases
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait BusinessCaseStore: Send + Sync {
    /// The open business case attached to an intake
    async fn fetch_open_business_case(&self, intake_id: Uuid) -> Result<BusinessCase, StoreError>;

    /// Save a business case, replacing all of its lifecycle cost lines
    async fn update_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError>;
}

/// Audit log writer
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ActionStore: Send + Sync {
    async fn create_action(&self, action: &Action) -> Result<Action, StoreError>;

    async fn fetch_actions_by_intake(&self, intake_id: Uuid) -> Result<Vec<Action>, StoreError>;
}

/// User directory lookups
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a directory ID. `Ok(None)` means the directory has no such user.
    async fn fetch_user_info(
        &self,
        ctx: &RequestContext,
        eua_user_id: &str,
    ) -> Result<Option<UserInfo>, WorkflowError>;
}

/// The external system of record that issues correlation (Alfabet) IDs
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait SystemOfRecord: Send + Sync {
    async fn validate_and_submit(
        &self,
        ctx: &RequestContext,
        intake: &SystemIntake,
    ) -> Result<String, WorkflowError>;
}

/// Outbound email
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the review team a new intake arrived
    async fn send_system_intake_submission_email(
        &self,
        requester: &str,
        intake_id: Uuid,
    ) -> Result<(), NotificationError>;

    /// Tell the review team a business case arrived
    async fn send_business_case_submission_email(
        &self,
        requester: &str,
        business_case_id: Uuid,
    ) -> Result<(), NotificationError>;

    /// Send a review decision to the requester
    async fn send_review_email(
        &self,
        email: &ReviewEmail,
        recipient: &str,
    ) -> Result<(), NotificationError>;
}

/// Authorization checks tied to a specific intake
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait IntakeAuthorizer: Send + Sync {
    async fn authorize(
        &self,
        ctx: &RequestContext,
        intake: &SystemIntake,
    ) -> Result<bool, WorkflowError>;
}

/// Authorization checks that only look at the caller
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait ReviewAuthorizer: Send + Sync {
    async fn authorize(&self, ctx: &RequestContext) -> Result<bool, WorkflowError>;
}

/// Structural checks a business case must pass before submission
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait BusinessCaseValidator: Send + Sync {
    fn validate_for_submit(&self, business_case: &BusinessCase) -> Result<(), ValidationError>;
}

/// Source of intake throughput numbers
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_system_intake_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SystemIntakeMetrics, StoreError>;
}
