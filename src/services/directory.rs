// Directory lookups shared by the workflow handlers

use crate::context::RequestContext;
use crate::errors::{ExternalOperation, WorkflowError};
use crate::models::{SystemIntake, UserInfo};
use crate::services::traits::UserDirectory;

pub const DIRECTORY_SOURCE: &str = "CEDAR LDAP";

fn lookup_failed(intake: &SystemIntake) -> WorkflowError {
    WorkflowError::external(
        DIRECTORY_SOURCE,
        ExternalOperation::Fetch,
        "system intake",
        intake.id,
        "user info fetch was not successful",
    )
}

/// Resolve the caller. Email, display name and directory ID must all be present.
pub async fn resolve_actor(
    directory: &dyn UserDirectory,
    ctx: &RequestContext,
    intake: &SystemIntake,
) -> Result<UserInfo, WorkflowError> {
    match directory.fetch_user_info(ctx, ctx.principal_id()).await? {
        Some(info) if info.is_complete() => Ok(info),
        _ => Err(lookup_failed(intake)),
    }
}

/// Resolve the intake's requester. Only an email address is required.
pub async fn resolve_requester(
    directory: &dyn UserDirectory,
    ctx: &RequestContext,
    intake: &SystemIntake,
) -> Result<UserInfo, WorkflowError> {
    match directory.fetch_user_info(ctx, &intake.eua_user_id).await? {
        Some(info) if !info.email.is_empty() => Ok(info),
        _ => Err(lookup_failed(intake)),
    }
}
