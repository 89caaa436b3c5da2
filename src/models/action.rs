use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{SystemIntakeStatus, UserInfo};

/// Kinds of workflow action a caller can submit against an intake.
///
/// Values arriving from the API layer that do not name a known action are kept
/// as `Unrecognized` so the dispatcher can reject them with a conflict instead
/// of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    SubmitIntake,
    SubmitBizCase,
    NotItRequest,
    NeedBizCase,
    ReadyForGrt,
    ProvideFeedbackNeedBizCase,
    ReadyForGrb,
    IssueLcid,
    Unrecognized(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::SubmitIntake => "SUBMIT_INTAKE",
            ActionType::SubmitBizCase => "SUBMIT_BIZCASE",
            ActionType::NotItRequest => "NOT_IT_REQUEST",
            ActionType::NeedBizCase => "NEED_BIZ_CASE",
            ActionType::ReadyForGrt => "READY_FOR_GRT",
            ActionType::ProvideFeedbackNeedBizCase => "PROVIDE_FEEDBACK_NEED_BIZ_CASE",
            ActionType::ReadyForGrb => "READY_FOR_GRB",
            ActionType::IssueLcid => "ISSUE_LCID",
            ActionType::Unrecognized(raw) => raw,
        }
    }

    /// Status a review action moves the intake to, for the status-transition family
    pub fn target_status(&self) -> Option<SystemIntakeStatus> {
        match self {
            ActionType::NotItRequest => Some(SystemIntakeStatus::NotItRequest),
            ActionType::NeedBizCase | ActionType::ProvideFeedbackNeedBizCase => {
                Some(SystemIntakeStatus::NeedBizCase)
            }
            ActionType::ReadyForGrt => Some(SystemIntakeStatus::ReadyForGrt),
            ActionType::ReadyForGrb => Some(SystemIntakeStatus::ReadyForGrb),
            ActionType::IssueLcid => Some(SystemIntakeStatus::LcidIssued),
            _ => None,
        }
    }

    /// Review actions that may be applied to an intake already in their target status
    pub fn repeats_status(&self) -> bool {
        matches!(self, ActionType::ProvideFeedbackNeedBizCase)
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "SUBMIT_INTAKE" => ActionType::SubmitIntake,
            "SUBMIT_BIZCASE" => ActionType::SubmitBizCase,
            "NOT_IT_REQUEST" => ActionType::NotItRequest,
            "NEED_BIZ_CASE" => ActionType::NeedBizCase,
            "READY_FOR_GRT" => ActionType::ReadyForGrt,
            "PROVIDE_FEEDBACK_NEED_BIZ_CASE" => ActionType::ProvideFeedbackNeedBizCase,
            "READY_FOR_GRB" => ActionType::ReadyForGrb,
            "ISSUE_LCID" => ActionType::IssueLcid,
            _ => ActionType::Unrecognized(value),
        }
    }
}

impl From<&str> for ActionType {
    fn from(value: &str) -> Self {
        ActionType::from(value.to_string())
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one workflow transition.
///
/// Actor fields are a snapshot taken when the action happened, not a live
/// reference to the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub intake_id: Option<Uuid>,
    pub action_type: ActionType,
    pub actor_name: String,
    pub actor_email: String,
    pub actor_eua_user_id: String,
    pub feedback: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Action {
    pub fn new(intake_id: Uuid, action_type: ActionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            intake_id: Some(intake_id),
            action_type,
            actor_name: String::new(),
            actor_email: String::new(),
            actor_eua_user_id: String::new(),
            feedback: None,
            created_at: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    /// Copy the actor's directory identity onto this action
    pub fn stamp_actor(&mut self, actor: &UserInfo) {
        self.actor_name = actor.common_name.clone();
        self.actor_email = actor.email.clone();
        self.actor_eua_user_id = actor.eua_user_id.clone();
    }
}
