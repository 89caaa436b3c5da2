// Submission of the open business case attached to an intake

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::clock::Clock;
use crate::context::RequestContext;
use crate::errors::{QueryOperation, WorkflowError};
use crate::models::{Action, ActionType, SystemIntake, SystemIntakeStatus};
use crate::observability::workflow_metrics;
use crate::services::directory::resolve_actor;
use crate::services::dispatcher::ActionHandler;
use crate::services::traits::{
    ActionStore, BusinessCaseStore, BusinessCaseValidator, IntakeAuthorizer, IntakeStore,
    Notifier, UserDirectory,
};

pub struct SubmitBusinessCase {
    pub clock: Arc<dyn Clock>,
    pub authorizer: Arc<dyn IntakeAuthorizer>,
    pub business_cases: Arc<dyn BusinessCaseStore>,
    pub validator: Arc<dyn BusinessCaseValidator>,
    pub actions: Arc<dyn ActionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub intakes: Arc<dyn IntakeStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl SubmitBusinessCase {
    /// Submit the intake's open business case and move the intake to `BIZCASE_SUBMITTED`.
    ///
    /// The business case is saved before the intake. If the second write fails
    /// the case stays submitted while the intake status lags behind, never the
    /// other way round.
    pub async fn submit(&self, ctx: &RequestContext, intake: SystemIntake) -> Result<(), WorkflowError> {
        if !self.authorizer.authorize(ctx, &intake).await? {
            return Err(WorkflowError::unauthorized());
        }

        let mut business_case = self
            .business_cases
            .fetch_open_business_case(intake.id)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Fetch, "business case", e))?;

        let submitted_at = self.clock.now();
        business_case.mark_submitted(submitted_at);

        self.validator.validate_for_submit(&business_case)?;

        let actor = resolve_actor(self.directory.as_ref(), ctx, &intake).await?;

        let mut action = Action::new(intake.id, ActionType::SubmitBizCase);
        action.stamp_actor(&actor);
        self.actions
            .create_action(&action)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Post, "action", e))?;

        let business_case = self
            .business_cases
            .update_business_case(&business_case)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Save, "business case", e))?;

        let prior_status = intake.status;
        let mut intake = intake;
        intake.status = SystemIntakeStatus::BizCaseSubmitted;
        intake.updated_at = Some(submitted_at);
        let intake = self
            .intakes
            .update_system_intake(&intake, prior_status)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Save, "system intake", e))?;

        info!(
            intake.id = %intake.id,
            business_case.id = %business_case.id,
            "Business case submitted"
        );

        let requester = business_case
            .requester
            .as_deref()
            .unwrap_or(&intake.requester);
        if let Err(e) = self
            .notifier
            .send_business_case_submission_email(requester, business_case.id)
            .await
        {
            workflow_metrics().record_notification_failure();
            error!(
                business_case.id = %business_case.id,
                error = %e,
                "Submit business case email failed to send"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl ActionHandler for SubmitBusinessCase {
    async fn handle(
        &self,
        ctx: &RequestContext,
        intake: SystemIntake,
        _action: Action,
    ) -> Result<(), WorkflowError> {
        self.submit(ctx, intake).await
    }
}
