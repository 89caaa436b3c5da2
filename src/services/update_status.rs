// Review actions that move an intake to a fixed status and email the requester

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::context::RequestContext;
use crate::errors::{ExternalOperation, QueryOperation, WorkflowError};
use crate::models::{Action, SystemIntake, SystemIntakeStatus};
use crate::services::directory::{resolve_actor, resolve_requester};
use crate::services::dispatcher::ActionHandler;
use crate::services::templates::ReviewTemplate;
use crate::services::traits::{ActionStore, IntakeStore, Notifier, ReviewAuthorizer, UserDirectory};

pub const EMAIL_SOURCE: &str = "Email";

/// One member of the status-transition family, parameterized by target
/// status, authorization check and email template
pub struct UpdateStatus {
    pub new_status: SystemIntakeStatus,
    pub template: ReviewTemplate,
    pub clock: Arc<dyn Clock>,
    pub authorizer: Arc<dyn ReviewAuthorizer>,
    pub intakes: Arc<dyn IntakeStore>,
    pub actions: Arc<dyn ActionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub notifier: Arc<dyn Notifier>,
}

impl UpdateStatus {
    /// Apply `action` to `intake`.
    ///
    /// Unlike the submission handlers, a failed review email is reported to
    /// the caller even though the transition has already been saved.
    pub async fn apply(
        &self,
        ctx: &RequestContext,
        intake: SystemIntake,
        mut action: Action,
    ) -> Result<(), WorkflowError> {
        if !self.authorizer.authorize(ctx).await? {
            return Err(WorkflowError::unauthorized());
        }

        if intake.status == self.new_status && !action.action_type.repeats_status() {
            return Err(WorkflowError::conflict(
                "system intake",
                intake.id,
                format!("intake is already in status {}", self.new_status),
            ));
        }

        let requester = resolve_requester(self.directory.as_ref(), ctx, &intake).await?;
        let actor = resolve_actor(self.directory.as_ref(), ctx, &intake).await?;

        action.stamp_actor(&actor);
        self.actions
            .create_action(&action)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Post, "action", e))?;

        let prior_status = intake.status;
        let mut intake = intake;
        intake.updated_at = Some(self.clock.now());
        intake.status = self.new_status;
        let intake = self
            .intakes
            .update_system_intake(&intake, prior_status)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Save, "system intake", e))?;

        info!(
            intake.id = %intake.id,
            from = %prior_status,
            to = %intake.status,
            "System intake status updated"
        );

        let email = (self.template)(&intake, &action);
        self.notifier
            .send_review_email(&email, &requester.email)
            .await
            .map_err(|e| {
                WorkflowError::external(
                    EMAIL_SOURCE,
                    ExternalOperation::Notify,
                    "system intake",
                    intake.id,
                    e.to_string(),
                )
            })
    }
}

#[async_trait]
impl ActionHandler for UpdateStatus {
    async fn handle(
        &self,
        ctx: &RequestContext,
        intake: SystemIntake,
        action: Action,
    ) -> Result<(), WorkflowError> {
        self.apply(ctx, intake, action).await
    }
}
