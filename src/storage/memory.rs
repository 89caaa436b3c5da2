// In-memory request store, audit log and metrics source

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    Action, BusinessCase, BusinessCaseStatus, EstimatedLifecycleCost, SystemIntake,
    SystemIntakeMetrics, SystemIntakeStatus,
};
use crate::services::traits::{ActionStore, BusinessCaseStore, IntakeStore, MetricsSource};
use crate::storage::tally_intake_metrics;

#[derive(Debug, Default)]
struct Tables {
    intakes: HashMap<Uuid, SystemIntake>,
    business_cases: HashMap<Uuid, BusinessCase>,
    /// Cost lines live apart from their case, like the relational schema
    cost_lines: Vec<EstimatedLifecycleCost>,
    actions: Vec<Action>,
}

/// Store backed by process memory. Writes to one store are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create_system_intake(&self, intake: &SystemIntake) -> Result<SystemIntake, StoreError> {
        let mut tables = self.tables();
        if tables.intakes.contains_key(&intake.id) {
            return Err(StoreError::Invalid(format!(
                "system intake {} already exists",
                intake.id
            )));
        }
        let mut created = intake.clone();
        let now = Utc::now();
        created.created_at = created.created_at.or(Some(now));
        created.updated_at = created.updated_at.or(Some(now));
        tables.intakes.insert(created.id, created.clone());
        Ok(created)
    }

    pub fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let mut tables = self.tables();
        if !tables.intakes.contains_key(&business_case.system_intake_id) {
            return Err(StoreError::IntakeMissing);
        }
        if business_case.eua_user_id.is_empty() {
            return Err(StoreError::Invalid("EUA ID is required".to_string()));
        }

        let mut created = business_case.clone();
        let now = Utc::now();
        created.created_at = Some(now);
        created.updated_at = Some(now);
        let lines = std::mem::take(&mut created.lifecycle_cost_lines);
        tables.business_cases.insert(created.id, created.clone());
        insert_cost_lines(&mut tables, created.id, &lines);

        Ok(hydrate(&tables, created))
    }

    pub fn fetch_business_case_by_id(&self, id: Uuid) -> Result<BusinessCase, StoreError> {
        let tables = self.tables();
        let stored = tables
            .business_cases
            .get(&id)
            .cloned()
            .ok_or_else(|| business_case_not_found(id))?;
        Ok(hydrate(&tables, stored))
    }

    pub fn fetch_business_cases_by_eua_id(&self, eua_user_id: &str) -> Vec<BusinessCase> {
        let tables = self.tables();
        let mut cases: Vec<BusinessCase> = tables
            .business_cases
            .values()
            .filter(|case| case.eua_user_id == eua_user_id)
            .cloned()
            .map(|case| hydrate(&tables, case))
            .collect();
        cases.sort_by_key(|case| case.created_at);
        cases
    }

    /// Number of stored cost line rows for a case
    pub fn cost_line_count(&self, business_case_id: Uuid) -> usize {
        self.tables()
            .cost_lines
            .iter()
            .filter(|line| line.business_case_id == business_case_id)
            .count()
    }

    pub fn action_count(&self) -> usize {
        self.tables().actions.len()
    }
}

fn business_case_not_found(id: Uuid) -> StoreError {
    StoreError::NotFound {
        resource: "business case",
        id: id.to_string(),
    }
}

fn insert_cost_lines(tables: &mut Tables, business_case_id: Uuid, lines: &[EstimatedLifecycleCost]) {
    tables.cost_lines.extend(lines.iter().map(|line| EstimatedLifecycleCost {
        id: Uuid::new_v4(),
        business_case_id,
        ..line.clone()
    }));
}

/// Attach cost lines and the parent intake's status to a stored case
fn hydrate(tables: &Tables, mut business_case: BusinessCase) -> BusinessCase {
    business_case.lifecycle_cost_lines = tables
        .cost_lines
        .iter()
        .filter(|line| line.business_case_id == business_case.id)
        .cloned()
        .collect();
    business_case.system_intake_status = tables
        .intakes
        .get(&business_case.system_intake_id)
        .map(|intake| intake.status);
    business_case
}

#[async_trait]
impl IntakeStore for MemoryStore {
    async fn fetch_system_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError> {
        self.tables()
            .intakes
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                resource: "system intake",
                id: id.to_string(),
            })
    }

    async fn update_system_intake(
        &self,
        intake: &SystemIntake,
        expected_status: SystemIntakeStatus,
    ) -> Result<SystemIntake, StoreError> {
        let mut tables = self.tables();
        let stored = tables
            .intakes
            .get_mut(&intake.id)
            .ok_or_else(|| StoreError::NotFound {
                resource: "system intake",
                id: intake.id.to_string(),
            })?;
        if stored.status != expected_status {
            return Err(StoreError::StaleStatus {
                resource: "system intake",
                id: intake.id.to_string(),
                expected: expected_status,
                found: stored.status,
            });
        }
        *stored = intake.clone();
        Ok(stored.clone())
    }
}

#[async_trait]
impl BusinessCaseStore for MemoryStore {
    async fn fetch_open_business_case(&self, intake_id: Uuid) -> Result<BusinessCase, StoreError> {
        let tables = self.tables();
        let open = tables
            .business_cases
            .values()
            .find(|case| {
                case.system_intake_id == intake_id && case.status == BusinessCaseStatus::Open
            })
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                resource: "business case",
                id: intake_id.to_string(),
            })?;
        Ok(hydrate(&tables, open))
    }

    async fn update_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let mut tables = self.tables();
        let existing = tables
            .business_cases
            .get(&business_case.id)
            .cloned()
            .ok_or_else(|| business_case_not_found(business_case.id))?;

        let mut updated = business_case.clone();
        updated.system_intake_id = existing.system_intake_id;
        updated.eua_user_id = existing.eua_user_id;
        updated.created_at = existing.created_at;
        updated.updated_at = updated.updated_at.or(Some(Utc::now()));
        let lines = std::mem::take(&mut updated.lifecycle_cost_lines);
        tables.business_cases.insert(updated.id, updated.clone());

        tables
            .cost_lines
            .retain(|line| line.business_case_id != updated.id);
        insert_cost_lines(&mut tables, updated.id, &lines);

        Ok(hydrate(&tables, updated))
    }
}

#[async_trait]
impl ActionStore for MemoryStore {
    async fn create_action(&self, action: &Action) -> Result<Action, StoreError> {
        let mut created = action.clone();
        created.created_at = created.created_at.or(Some(Utc::now()));
        self.tables().actions.push(created.clone());
        Ok(created)
    }

    async fn fetch_actions_by_intake(&self, intake_id: Uuid) -> Result<Vec<Action>, StoreError> {
        Ok(self
            .tables()
            .actions
            .iter()
            .filter(|action| action.intake_id == Some(intake_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MetricsSource for MemoryStore {
    async fn fetch_system_intake_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SystemIntakeMetrics, StoreError> {
        let tables = self.tables();
        Ok(tally_intake_metrics(tables.intakes.values(), start, end))
    }
}
