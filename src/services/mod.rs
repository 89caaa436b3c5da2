// Workflow services - action dispatch and the handlers behind it
//
// Handlers are plain structs assembled from the collaborator traits in
// `traits`, so each can be built with real or mock dependencies.

pub mod actions;
pub mod authorization;
pub mod directory;
pub mod dispatcher;
pub mod metrics;
pub mod submit_business_case;
pub mod submit_intake;
pub mod templates;
pub mod traits;
pub mod update_status;
pub mod validation;

#[cfg(test)]
mod tests;

pub use actions::FetchActions;
pub use authorization::{GrtReviewerAuthorizer, RequesterAuthorizer};
pub use dispatcher::{ActionDispatcher, ActionHandler, WorkflowDependencies};
pub use metrics::FetchMetrics;
pub use submit_business_case::SubmitBusinessCase;
pub use submit_intake::SubmitIntake;
pub use templates::{ReviewEmail, ReviewTemplate};
pub use update_status::UpdateStatus;
pub use validation::SubmitValidator;
