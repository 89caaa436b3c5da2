// Read access to an intake's audit trail

use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{QueryOperation, StoreError, WorkflowError};
use crate::models::Action;
use crate::services::traits::{ActionStore, IntakeStore};

pub struct FetchActions {
    pub intakes: Arc<dyn IntakeStore>,
    pub actions: Arc<dyn ActionStore>,
}

impl FetchActions {
    /// Actions recorded against an intake, oldest first
    pub async fn for_intake(&self, intake_id: Uuid) -> Result<Vec<Action>, WorkflowError> {
        match self.intakes.fetch_system_intake(intake_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound { resource, id }) => {
                return Err(WorkflowError::ResourceNotFound { resource, id })
            }
            Err(e) => return Err(WorkflowError::query(QueryOperation::Fetch, "system intake", e)),
        }

        let mut actions = self
            .actions
            .fetch_actions_by_intake(intake_id)
            .await
            .map_err(|e| WorkflowError::query(QueryOperation::Fetch, "action", e))?;
        actions.sort_by_key(|action| action.created_at);
        Ok(actions)
    }
}
