// 508 accessibility requests and their uploaded documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityRequest {
    pub id: Uuid,
    pub name: String,
    pub intake_id: Uuid,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    Available,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityRequestDocument {
    pub id: Uuid,
    pub request_id: Uuid,
    pub file_name: String,
    pub virus_scanned: Option<bool>,
    pub virus_clean: Option<bool>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl AccessibilityRequestDocument {
    /// Availability derived from the two scan flags. Unscanned files stay pending.
    pub fn status(&self) -> DocumentStatus {
        match (self.virus_scanned, self.virus_clean) {
            (Some(true), Some(true)) => DocumentStatus::Available,
            (Some(true), Some(false)) => DocumentStatus::Unavailable,
            _ => DocumentStatus::Pending,
        }
    }
}
