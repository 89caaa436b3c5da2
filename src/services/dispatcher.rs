// Routes submitted actions to the handler registered for their type

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{warn, Instrument};

use crate::clock::Clock;
use crate::context::RequestContext;
use crate::errors::{QueryOperation, WorkflowError};
use crate::models::{Action, ActionType, SystemIntake};
use crate::observability::{create_action_span, workflow_metrics};
use crate::services::submit_business_case::SubmitBusinessCase;
use crate::services::submit_intake::SubmitIntake;
use crate::services::templates::{self, ReviewTemplate};
use crate::services::traits::{
    ActionStore, BusinessCaseStore, BusinessCaseValidator, IntakeAuthorizer, IntakeStore,
    Notifier, ReviewAuthorizer, SystemOfRecord, UserDirectory,
};
use crate::services::update_status::UpdateStatus;

/// A workflow step for one action type
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &RequestContext,
        intake: SystemIntake,
        action: Action,
    ) -> Result<(), WorkflowError>;
}

/// Everything the standard handlers are assembled from
#[derive(Clone)]
pub struct WorkflowDependencies {
    pub clock: Arc<dyn Clock>,
    pub intakes: Arc<dyn IntakeStore>,
    pub business_cases: Arc<dyn BusinessCaseStore>,
    pub actions: Arc<dyn ActionStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub system_of_record: Arc<dyn SystemOfRecord>,
    pub notifier: Arc<dyn Notifier>,
    /// Who may submit an intake or business case
    pub requester_authorizer: Arc<dyn IntakeAuthorizer>,
    /// Who may take review actions
    pub review_authorizer: Arc<dyn ReviewAuthorizer>,
    pub validator: Arc<dyn BusinessCaseValidator>,
}

impl WorkflowDependencies {
    pub fn submit_intake(&self) -> SubmitIntake {
        SubmitIntake {
            clock: self.clock.clone(),
            authorizer: self.requester_authorizer.clone(),
            intakes: self.intakes.clone(),
            system_of_record: self.system_of_record.clone(),
            actions: self.actions.clone(),
            directory: self.directory.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn submit_business_case(&self) -> SubmitBusinessCase {
        SubmitBusinessCase {
            clock: self.clock.clone(),
            authorizer: self.requester_authorizer.clone(),
            business_cases: self.business_cases.clone(),
            validator: self.validator.clone(),
            actions: self.actions.clone(),
            directory: self.directory.clone(),
            intakes: self.intakes.clone(),
            notifier: self.notifier.clone(),
        }
    }

    pub fn update_status(&self, action_type: &ActionType, template: ReviewTemplate) -> Option<UpdateStatus> {
        let new_status = action_type.target_status()?;
        Some(UpdateStatus {
            new_status,
            template,
            clock: self.clock.clone(),
            authorizer: self.review_authorizer.clone(),
            intakes: self.intakes.clone(),
            actions: self.actions.clone(),
            directory: self.directory.clone(),
            notifier: self.notifier.clone(),
        })
    }
}

pub struct ActionDispatcher {
    intakes: Arc<dyn IntakeStore>,
    handlers: HashMap<ActionType, Arc<dyn ActionHandler>>,
}

impl ActionDispatcher {
    /// A dispatcher with no handlers registered
    pub fn new(intakes: Arc<dyn IntakeStore>) -> Self {
        Self {
            intakes,
            handlers: HashMap::new(),
        }
    }

    /// A dispatcher wired with every supported action type
    pub fn standard(deps: &WorkflowDependencies) -> Self {
        let mut dispatcher = Self::new(deps.intakes.clone());
        dispatcher.register(ActionType::SubmitIntake, Arc::new(deps.submit_intake()));
        dispatcher.register(ActionType::SubmitBizCase, Arc::new(deps.submit_business_case()));

        let review_actions: [(ActionType, ReviewTemplate); 6] = [
            (ActionType::NotItRequest, templates::not_it_request),
            (ActionType::NeedBizCase, templates::need_business_case),
            (ActionType::ReadyForGrt, templates::ready_for_grt),
            (
                ActionType::ProvideFeedbackNeedBizCase,
                templates::business_case_feedback,
            ),
            (ActionType::ReadyForGrb, templates::ready_for_grb),
            (ActionType::IssueLcid, templates::lifecycle_id_issued),
        ];
        for (action_type, template) in review_actions {
            if let Some(handler) = deps.update_status(&action_type, template) {
                dispatcher.register(action_type, Arc::new(handler));
            }
        }
        dispatcher
    }

    pub fn register(&mut self, action_type: ActionType, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(action_type, handler);
    }

    pub fn supports(&self, action_type: &ActionType) -> bool {
        self.handlers.contains_key(action_type)
    }

    /// Fetch the action's intake and run exactly one handler for it
    pub async fn dispatch(&self, ctx: &RequestContext, action: Action) -> Result<(), WorkflowError> {
        let span = create_action_span(
            action.action_type.as_str(),
            action.intake_id,
            &ctx.correlation_id,
        );
        let action_type = action.action_type.clone();

        let result = self.route(ctx, action).instrument(span).await;

        let metrics = workflow_metrics();
        match &result {
            Ok(()) => metrics.record_success(),
            Err(e) => {
                metrics.record_failure(e.kind());
                warn!(
                    action_type = %action_type,
                    error.kind = e.kind().as_str(),
                    error = %e,
                    "Workflow action failed"
                );
            }
        }
        result
    }

    async fn route(&self, ctx: &RequestContext, action: Action) -> Result<(), WorkflowError> {
        workflow_metrics().record_dispatch();

        let intake_id = action.intake_id.ok_or_else(|| {
            WorkflowError::conflict("action", action.id, "action has no intake ID")
        })?;

        let intake = self
            .intakes
            .fetch_system_intake(intake_id)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Fetch, "system intake", e))?;

        let Some(handler) = self.handlers.get(&action.action_type) else {
            return Err(WorkflowError::conflict(
                "system intake",
                intake.id,
                "invalid action type",
            ));
        };

        handler.handle(ctx, intake, action).await
    }
}
