// Default authorization rules

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::errors::WorkflowError;
use crate::models::SystemIntake;
use crate::services::traits::{IntakeAuthorizer, ReviewAuthorizer};

/// Only the requester who owns an intake may submit it
#[derive(Debug, Default, Clone, Copy)]
pub struct RequesterAuthorizer;

#[async_trait]
impl IntakeAuthorizer for RequesterAuthorizer {
    async fn authorize(
        &self,
        ctx: &RequestContext,
        intake: &SystemIntake,
    ) -> Result<bool, WorkflowError> {
        let allowed = !intake.eua_user_id.is_empty() && intake.eua_user_id == ctx.principal_id();
        if !allowed {
            tracing::info!(
                principal = ctx.principal_id(),
                intake.id = %intake.id,
                "Principal does not own intake"
            );
        }
        Ok(allowed)
    }
}

/// Review actions require the Governance Review Team job code
#[derive(Debug, Default, Clone, Copy)]
pub struct GrtReviewerAuthorizer;

#[async_trait]
impl ReviewAuthorizer for GrtReviewerAuthorizer {
    async fn authorize(&self, ctx: &RequestContext) -> Result<bool, WorkflowError> {
        let allowed = ctx.principal.allow_grt();
        if !allowed {
            tracing::info!(principal = ctx.principal_id(), "Principal is not a GRT reviewer");
        }
        Ok(allowed)
    }
}
