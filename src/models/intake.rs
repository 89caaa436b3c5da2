use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UnknownVariant;

/// Workflow states a system intake moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemIntakeStatus {
    #[serde(rename = "INITIAL")]
    Initial,
    #[serde(rename = "INTAKE_SUBMITTED")]
    IntakeSubmitted,
    #[serde(rename = "NEED_BIZ_CASE")]
    NeedBizCase,
    #[serde(rename = "BIZCASE_SUBMITTED")]
    BizCaseSubmitted,
    #[serde(rename = "READY_FOR_GRT")]
    ReadyForGrt,
    #[serde(rename = "READY_FOR_GRB")]
    ReadyForGrb,
    #[serde(rename = "NOT_IT_REQUEST")]
    NotItRequest,
    #[serde(rename = "LCID_ISSUED")]
    LcidIssued,
}

impl SystemIntakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemIntakeStatus::Initial => "INITIAL",
            SystemIntakeStatus::IntakeSubmitted => "INTAKE_SUBMITTED",
            SystemIntakeStatus::NeedBizCase => "NEED_BIZ_CASE",
            SystemIntakeStatus::BizCaseSubmitted => "BIZCASE_SUBMITTED",
            SystemIntakeStatus::ReadyForGrt => "READY_FOR_GRT",
            SystemIntakeStatus::ReadyForGrb => "READY_FOR_GRB",
            SystemIntakeStatus::NotItRequest => "NOT_IT_REQUEST",
            SystemIntakeStatus::LcidIssued => "LCID_ISSUED",
        }
    }
}

impl fmt::Display for SystemIntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemIntakeStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIAL" => Ok(SystemIntakeStatus::Initial),
            "INTAKE_SUBMITTED" => Ok(SystemIntakeStatus::IntakeSubmitted),
            "NEED_BIZ_CASE" => Ok(SystemIntakeStatus::NeedBizCase),
            "BIZCASE_SUBMITTED" => Ok(SystemIntakeStatus::BizCaseSubmitted),
            "READY_FOR_GRT" => Ok(SystemIntakeStatus::ReadyForGrt),
            "READY_FOR_GRB" => Ok(SystemIntakeStatus::ReadyForGrb),
            "NOT_IT_REQUEST" => Ok(SystemIntakeStatus::NotItRequest),
            "LCID_ISSUED" => Ok(SystemIntakeStatus::LcidIssued),
            other => Err(UnknownVariant {
                kind: "system intake status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemIntakeRequestType {
    New,
    MajorChanges,
    Recompete,
    Shutdown,
}

impl SystemIntakeRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemIntakeRequestType::New => "NEW",
            SystemIntakeRequestType::MajorChanges => "MAJOR_CHANGES",
            SystemIntakeRequestType::Recompete => "RECOMPETE",
            SystemIntakeRequestType::Shutdown => "SHUTDOWN",
        }
    }
}

impl FromStr for SystemIntakeRequestType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(SystemIntakeRequestType::New),
            "MAJOR_CHANGES" => Ok(SystemIntakeRequestType::MajorChanges),
            "RECOMPETE" => Ok(SystemIntakeRequestType::Recompete),
            "SHUTDOWN" => Ok(SystemIntakeRequestType::Shutdown),
            other => Err(UnknownVariant {
                kind: "request type",
                value: other.to_string(),
            }),
        }
    }
}

/// The primary governance request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemIntake {
    pub id: Uuid,
    /// Directory ID of the requester
    pub eua_user_id: String,
    pub requester: String,
    pub component: Option<String>,
    pub business_owner: Option<String>,
    pub business_owner_component: Option<String>,
    pub project_name: Option<String>,
    pub status: SystemIntakeStatus,
    pub request_type: SystemIntakeRequestType,
    /// Correlation ID issued by the system of record. Set at most once.
    pub alfabet_id: Option<String>,
    pub lifecycle_id: Option<String>,
    pub grt_review_email_body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl SystemIntake {
    /// A fresh intake in `INITIAL` status owned by `eua_user_id`
    pub fn new(eua_user_id: impl Into<String>, requester: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            eua_user_id: eua_user_id.into(),
            requester: requester.into(),
            component: None,
            business_owner: None,
            business_owner_component: None,
            project_name: None,
            status: SystemIntakeStatus::Initial,
            request_type: SystemIntakeRequestType::New,
            alfabet_id: None,
            lifecycle_id: None,
            grt_review_email_body: None,
            created_at: None,
            updated_at: None,
            submitted_at: None,
        }
    }

    pub fn is_submitted_to_system_of_record(&self) -> bool {
        self.alfabet_id.is_some()
    }
}
