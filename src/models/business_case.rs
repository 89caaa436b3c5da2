use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::{SystemIntakeStatus, UnknownVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessCaseStatus {
    Open,
    Closed,
}

impl BusinessCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessCaseStatus::Open => "OPEN",
            BusinessCaseStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for BusinessCaseStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(BusinessCaseStatus::Open),
            "CLOSED" => Ok(BusinessCaseStatus::Closed),
            other => Err(UnknownVariant {
                kind: "business case status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleCostSolution {
    #[serde(rename = "As Is")]
    AsIs,
    Preferred,
    A,
    B,
}

impl LifecycleCostSolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleCostSolution::AsIs => "As Is",
            LifecycleCostSolution::Preferred => "Preferred",
            LifecycleCostSolution::A => "A",
            LifecycleCostSolution::B => "B",
        }
    }
}

impl FromStr for LifecycleCostSolution {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "As Is" => Ok(LifecycleCostSolution::AsIs),
            "Preferred" => Ok(LifecycleCostSolution::Preferred),
            "A" => Ok(LifecycleCostSolution::A),
            "B" => Ok(LifecycleCostSolution::B),
            other => Err(UnknownVariant {
                kind: "lifecycle cost solution",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleCostPhase {
    Development,
    #[serde(rename = "Operations and Maintenance")]
    OperationsAndMaintenance,
}

impl LifecycleCostPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleCostPhase::Development => "Development",
            LifecycleCostPhase::OperationsAndMaintenance => "Operations and Maintenance",
        }
    }
}

impl FromStr for LifecycleCostPhase {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Development" => Ok(LifecycleCostPhase::Development),
            "Operations and Maintenance" => Ok(LifecycleCostPhase::OperationsAndMaintenance),
            other => Err(UnknownVariant {
                kind: "lifecycle cost phase",
                value: other.to_string(),
            }),
        }
    }
}

/// Year of the estimate, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifecycleCostYear {
    #[serde(rename = "1")]
    Year1,
    #[serde(rename = "2")]
    Year2,
    #[serde(rename = "3")]
    Year3,
    #[serde(rename = "4")]
    Year4,
    #[serde(rename = "5")]
    Year5,
}

impl LifecycleCostYear {
    pub const ALL: [LifecycleCostYear; 5] = [
        LifecycleCostYear::Year1,
        LifecycleCostYear::Year2,
        LifecycleCostYear::Year3,
        LifecycleCostYear::Year4,
        LifecycleCostYear::Year5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleCostYear::Year1 => "1",
            LifecycleCostYear::Year2 => "2",
            LifecycleCostYear::Year3 => "3",
            LifecycleCostYear::Year4 => "4",
            LifecycleCostYear::Year5 => "5",
        }
    }
}

impl FromStr for LifecycleCostYear {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LifecycleCostYear::ALL
            .into_iter()
            .find(|year| year.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "lifecycle cost year",
                value: s.to_string(),
            })
    }
}

/// One cost estimate line, keyed by solution, phase and year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedLifecycleCost {
    pub id: Uuid,
    pub business_case_id: Uuid,
    pub solution: LifecycleCostSolution,
    pub phase: Option<LifecycleCostPhase>,
    pub year: LifecycleCostYear,
    pub cost: Option<i64>,
}

impl EstimatedLifecycleCost {
    pub fn new(solution: LifecycleCostSolution, year: LifecycleCostYear, cost: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_case_id: Uuid::nil(),
            solution,
            phase: Some(LifecycleCostPhase::Development),
            year,
            cost: Some(cost),
        }
    }
}

/// A costed proposal submitted against a system intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessCase {
    pub id: Uuid,
    pub system_intake_id: Uuid,
    /// Status of the owning intake, filled in on fetch
    pub system_intake_status: Option<SystemIntakeStatus>,
    pub eua_user_id: String,
    pub status: BusinessCaseStatus,
    pub project_name: Option<String>,
    pub requester: Option<String>,
    pub requester_phone_number: Option<String>,
    pub business_owner: Option<String>,
    pub business_need: Option<String>,
    pub priority_alignment: Option<String>,
    pub success_indicators: Option<String>,
    /// Replaced wholesale on every update
    pub lifecycle_cost_lines: Vec<EstimatedLifecycleCost>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Set on the first submission only
    pub initial_submitted_at: Option<DateTime<Utc>>,
    pub last_submitted_at: Option<DateTime<Utc>>,
}

impl BusinessCase {
    pub fn new(system_intake_id: Uuid, eua_user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            system_intake_id,
            system_intake_status: None,
            eua_user_id: eua_user_id.into(),
            status: BusinessCaseStatus::Open,
            project_name: None,
            requester: None,
            requester_phone_number: None,
            business_owner: None,
            business_need: None,
            priority_alignment: None,
            success_indicators: None,
            lifecycle_cost_lines: Vec::new(),
            created_at: None,
            updated_at: None,
            initial_submitted_at: None,
            last_submitted_at: None,
        }
    }

    /// Record a submission at `at`, keeping the first-submission marker intact
    pub fn mark_submitted(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(at);
        if self.initial_submitted_at.is_none() {
            self.initial_submitted_at = Some(at);
        }
        self.last_submitted_at = Some(at);
    }
}
