// Submission of a system intake to the system of record

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::clock::Clock;
use crate::context::RequestContext;
use crate::errors::{ExternalOperation, QueryOperation, WorkflowError};
use crate::models::{Action, ActionType, SystemIntake, SystemIntakeStatus};
use crate::observability::workflow_metrics;
use crate::services::directory::resolve_actor;
use crate::services::dispatcher::ActionHandler;
use crate::services::traits::{
    ActionStore, IntakeAuthorizer, IntakeStore, Notifier, SystemOfRecord, UserDirectory,
};

pub const SYSTEM_OF_RECORD_SOURCE: &str = "CEDAR EASi";

pub struct SubmitIntake {
    pub clock: Arc<dyn Clock>,
    pub authorizer: Arc<dyn IntakeAuthorizer>,
    pub intakes: Arc<dyn IntakeStore>,
    pub system_of_record: Arc<dyn SystemOfRecord>,
    pub actions: Arc<dyn ActionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub notifier: Arc<dyn Notifier>,
}

impl SubmitIntake {
    /// Submit `intake`, issuing its Alfabet ID and recording a `SUBMIT_INTAKE` action.
    ///
    /// Nothing is written unless authorization, the not-yet-submitted check,
    /// the directory lookup and the system of record all succeed. The reviewer
    /// email afterwards is best-effort.
    pub async fn submit(&self, ctx: &RequestContext, intake: SystemIntake) -> Result<(), WorkflowError> {
        if !self.authorizer.authorize(ctx, &intake).await? {
            return Err(WorkflowError::unauthorized());
        }

        if intake.is_submitted_to_system_of_record() {
            return Err(WorkflowError::conflict(
                "system intake",
                intake.id,
                "intake has already been submitted to CEDAR",
            ));
        }

        let actor = resolve_actor(self.directory.as_ref(), ctx, &intake).await?;

        let prior_status = intake.status;
        let mut intake = intake;
        let submitted_at = self.clock.now();
        intake.updated_at = Some(submitted_at);
        intake.submitted_at = Some(submitted_at);
        intake.status = SystemIntakeStatus::IntakeSubmitted;

        let alfabet_id = self.system_of_record.validate_and_submit(ctx, &intake).await?;
        if alfabet_id.is_empty() {
            return Err(WorkflowError::external(
                SYSTEM_OF_RECORD_SOURCE,
                ExternalOperation::Submit,
                "system intake",
                intake.id,
                "submission was not successful",
            ));
        }
        intake.alfabet_id = Some(alfabet_id);

        let mut action = Action::new(intake.id, ActionType::SubmitIntake);
        action.stamp_actor(&actor);
        self.actions
            .create_action(&action)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Post, "action", e))?;

        let intake = self
            .intakes
            .update_system_intake(&intake, prior_status)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Save, "system intake", e))?;

        info!(
            intake.id = %intake.id,
            alfabet.id = intake.alfabet_id.as_deref().unwrap_or_default(),
            "System intake submitted"
        );

        if let Err(e) = self
            .notifier
            .send_system_intake_submission_email(&intake.requester, intake.id)
            .await
        {
            workflow_metrics().record_notification_failure();
            error!(intake.id = %intake.id, error = %e, "Submit intake email failed to send");
        }

        Ok(())
    }
}

#[async_trait]
impl ActionHandler for SubmitIntake {
    async fn handle(
        &self,
        ctx: &RequestContext,
        intake: SystemIntake,
        _action: Action,
    ) -> Result<(), WorkflowError> {
        self.submit(ctx, intake).await
    }
}
