use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use super::{local_dependencies, open_store, Command};
use easi_workflow::{
    Action, ActionDispatcher, ActionType, EasiConfig, Principal, RequestContext, WorkflowError,
    GRT_JOB_CODE,
};
use easi_workflow::services::traits::IntakeStore;

pub struct DispatchCommand {
    config: EasiConfig,
    intake_id: Uuid,
    action: String,
    principal: String,
    grt: bool,
    feedback: Option<String>,
}

impl DispatchCommand {
    pub fn new(
        config: EasiConfig,
        intake_id: Uuid,
        action: String,
        principal: String,
        grt: bool,
        feedback: Option<String>,
    ) -> Self {
        Self {
            config,
            intake_id,
            action,
            principal,
            grt,
            feedback,
        }
    }

    fn context(&self) -> RequestContext {
        let mut principal = Principal::new(&self.principal);
        if self.grt {
            principal = principal.with_job_code(GRT_JOB_CODE);
        }
        RequestContext::new(principal)
    }
}

impl Command for DispatchCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config).await?;
        let dispatcher = ActionDispatcher::standard(&local_dependencies(&self.config, store.clone()));

        let ctx = self.context();
        let mut action = Action::new(self.intake_id, ActionType::from(self.action.as_str()));
        if let Some(feedback) = &self.feedback {
            action = action.with_feedback(feedback);
        }

        info!(
            correlation.id = %ctx.correlation_id,
            action_type = %action.action_type,
            "Dispatching action from command line"
        );

        match dispatcher.dispatch(&ctx, action).await {
            Ok(()) => {
                let intake = store.fetch_system_intake(self.intake_id).await?;
                println!("✅ {} applied", self.action);
                println!("   Intake {} is now {}", intake.id, intake.status);
                if let Some(alfabet_id) = &intake.alfabet_id {
                    println!("   Alfabet ID: {alfabet_id}");
                }
                Ok(())
            }
            Err(e) => {
                println!("❌ {} rejected ({})", self.action, e.kind().as_str());
                if let WorkflowError::Validation(validation) = &e {
                    for (field, message) in &validation.validations {
                        println!("   • {field} {message}");
                    }
                }
                Err(e.into())
            }
        }
    }
}
