// SQLite-backed request store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    Action, ActionType, BusinessCase, EstimatedLifecycleCost, SystemIntake, SystemIntakeMetrics,
    SystemIntakeStatus, UnknownVariant,
};
use crate::services::traits::{ActionStore, BusinessCaseStore, IntakeStore, MetricsSource};
use crate::storage::tally_intake_metrics;

const INTAKE_COLUMNS: &str = "id, eua_user_id, requester, component, business_owner, \
     business_owner_component, project_name, status, request_type, alfabet_id, lifecycle_id, \
     grt_review_email_body, created_at, updated_at, submitted_at";

const BUSINESS_CASE_COLUMNS: &str = "id, system_intake_id, eua_user_id, status, project_name, \
     requester, requester_phone_number, business_owner, business_need, priority_alignment, \
     success_indicators, created_at, updated_at, initial_submitted_at, last_submitted_at";

/// Request store persisted to SQLite
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url`
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        auto_migrate: bool,
    ) -> Result<Self, StoreError> {
        if !sqlx::Sqlite::database_exists(database_url).await? {
            info!("Creating database at {}", database_url);
            sqlx::Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        if auto_migrate {
            store.migrate().await?;
        }
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;
        info!("Database migrations completed");
        Ok(())
    }

    pub async fn create_system_intake(
        &self,
        intake: &SystemIntake,
    ) -> Result<SystemIntake, StoreError> {
        let mut created = intake.clone();
        let now = Utc::now();
        created.created_at = created.created_at.or(Some(now));
        created.updated_at = created.updated_at.or(Some(now));

        sqlx::query(&format!(
            "INSERT INTO system_intakes ({INTAKE_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ))
        .bind(created.id.to_string())
        .bind(&created.eua_user_id)
        .bind(&created.requester)
        .bind(&created.component)
        .bind(&created.business_owner)
        .bind(&created.business_owner_component)
        .bind(&created.project_name)
        .bind(created.status.as_str())
        .bind(created.request_type.as_str())
        .bind(&created.alfabet_id)
        .bind(&created.lifecycle_id)
        .bind(&created.grt_review_email_body)
        .bind(created.created_at)
        .bind(created.updated_at)
        .bind(created.submitted_at)
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn create_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        if business_case.eua_user_id.is_empty() {
            return Err(StoreError::Invalid("EUA ID is required".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let intake_exists = sqlx::query("SELECT 1 FROM system_intakes WHERE id = ?1")
            .bind(business_case.system_intake_id.to_string())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !intake_exists {
            return Err(StoreError::IntakeMissing);
        }

        let now = Utc::now();
        sqlx::query(&format!(
            "INSERT INTO business_cases ({BUSINESS_CASE_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
        ))
        .bind(business_case.id.to_string())
        .bind(business_case.system_intake_id.to_string())
        .bind(&business_case.eua_user_id)
        .bind(business_case.status.as_str())
        .bind(&business_case.project_name)
        .bind(&business_case.requester)
        .bind(&business_case.requester_phone_number)
        .bind(&business_case.business_owner)
        .bind(&business_case.business_need)
        .bind(&business_case.priority_alignment)
        .bind(&business_case.success_indicators)
        .bind(now)
        .bind(now)
        .bind(business_case.initial_submitted_at)
        .bind(business_case.last_submitted_at)
        .execute(&mut *tx)
        .await?;

        for line in &business_case.lifecycle_cost_lines {
            insert_cost_line(&mut tx, business_case.id, line).await?;
        }
        tx.commit().await?;

        self.fetch_business_case_by_id(business_case.id).await
    }

    pub async fn fetch_business_case_by_id(&self, id: Uuid) -> Result<BusinessCase, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_CASE_COLUMNS} FROM business_cases WHERE id = ?1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: "business case",
            id: id.to_string(),
        })?;

        self.hydrate(business_case_from_row(&row)?).await
    }

    pub async fn fetch_business_cases_by_eua_id(
        &self,
        eua_user_id: &str,
    ) -> Result<Vec<BusinessCase>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {BUSINESS_CASE_COLUMNS} FROM business_cases \
             WHERE eua_user_id = ?1 ORDER BY created_at ASC"
        ))
        .bind(eua_user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut cases = Vec::with_capacity(rows.len());
        for row in &rows {
            cases.push(self.hydrate(business_case_from_row(row)?).await?);
        }
        Ok(cases)
    }

    pub async fn cost_line_count(&self, business_case_id: Uuid) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM estimated_lifecycle_costs WHERE business_case_id = ?1",
        )
        .bind(business_case_id.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("count")?)
    }

    /// Attach cost lines and the parent intake's status
    async fn hydrate(&self, mut business_case: BusinessCase) -> Result<BusinessCase, StoreError> {
        let rows = sqlx::query(
            "SELECT id, business_case_id, solution, phase, year, cost \
             FROM estimated_lifecycle_costs WHERE business_case_id = ?1",
        )
        .bind(business_case.id.to_string())
        .fetch_all(&self.pool)
        .await?;
        business_case.lifecycle_cost_lines = rows
            .iter()
            .map(cost_line_from_row)
            .collect::<Result<_, _>>()?;

        let status: Option<String> = sqlx::query("SELECT status FROM system_intakes WHERE id = ?1")
            .bind(business_case.system_intake_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.try_get("status"))
            .transpose()?;
        business_case.system_intake_status = status.as_deref().map(parse).transpose()?;

        Ok(business_case)
    }
}

async fn insert_cost_line(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    business_case_id: Uuid,
    line: &EstimatedLifecycleCost,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO estimated_lifecycle_costs \
         (id, business_case_id, solution, phase, year, cost) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(business_case_id.to_string())
    .bind(line.solution.as_str())
    .bind(line.phase.map(|phase| phase.as_str()))
    .bind(line.year.as_str())
    .bind(line.cost)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

fn parse<T: FromStr<Err = UnknownVariant>>(value: &str) -> Result<T, StoreError> {
    value
        .parse()
        .map_err(|e: UnknownVariant| StoreError::Invalid(e.to_string()))
}

fn parse_id(value: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(value).map_err(|e| StoreError::Invalid(format!("bad id {value}: {e}")))
}

fn intake_from_row(row: &SqliteRow) -> Result<SystemIntake, StoreError> {
    let id: String = row.try_get("id")?;
    let status: String = row.try_get("status")?;
    let request_type: String = row.try_get("request_type")?;

    Ok(SystemIntake {
        id: parse_id(&id)?,
        eua_user_id: row.try_get("eua_user_id")?,
        requester: row.try_get("requester")?,
        component: row.try_get("component")?,
        business_owner: row.try_get("business_owner")?,
        business_owner_component: row.try_get("business_owner_component")?,
        project_name: row.try_get("project_name")?,
        status: parse(&status)?,
        request_type: parse(&request_type)?,
        alfabet_id: row.try_get("alfabet_id")?,
        lifecycle_id: row.try_get("lifecycle_id")?,
        grt_review_email_body: row.try_get("grt_review_email_body")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        submitted_at: row.try_get("submitted_at")?,
    })
}

fn business_case_from_row(row: &SqliteRow) -> Result<BusinessCase, StoreError> {
    let id: String = row.try_get("id")?;
    let intake_id: String = row.try_get("system_intake_id")?;
    let status: String = row.try_get("status")?;

    Ok(BusinessCase {
        id: parse_id(&id)?,
        system_intake_id: parse_id(&intake_id)?,
        system_intake_status: None,
        eua_user_id: row.try_get("eua_user_id")?,
        status: parse(&status)?,
        project_name: row.try_get("project_name")?,
        requester: row.try_get("requester")?,
        requester_phone_number: row.try_get("requester_phone_number")?,
        business_owner: row.try_get("business_owner")?,
        business_need: row.try_get("business_need")?,
        priority_alignment: row.try_get("priority_alignment")?,
        success_indicators: row.try_get("success_indicators")?,
        lifecycle_cost_lines: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        initial_submitted_at: row.try_get("initial_submitted_at")?,
        last_submitted_at: row.try_get("last_submitted_at")?,
    })
}

fn cost_line_from_row(row: &SqliteRow) -> Result<EstimatedLifecycleCost, StoreError> {
    let id: String = row.try_get("id")?;
    let business_case_id: String = row.try_get("business_case_id")?;
    let solution: String = row.try_get("solution")?;
    let phase: Option<String> = row.try_get("phase")?;
    let year: String = row.try_get("year")?;

    Ok(EstimatedLifecycleCost {
        id: parse_id(&id)?,
        business_case_id: parse_id(&business_case_id)?,
        solution: parse(&solution)?,
        phase: phase.as_deref().map(parse).transpose()?,
        year: parse(&year)?,
        cost: row.try_get("cost")?,
    })
}

fn action_from_row(row: &SqliteRow) -> Result<Action, StoreError> {
    let id: String = row.try_get("id")?;
    let intake_id: Option<String> = row.try_get("intake_id")?;
    let action_type: String = row.try_get("action_type")?;

    Ok(Action {
        id: parse_id(&id)?,
        intake_id: intake_id.as_deref().map(parse_id).transpose()?,
        action_type: ActionType::from(action_type),
        actor_name: row.try_get("actor_name")?,
        actor_email: row.try_get("actor_email")?,
        actor_eua_user_id: row.try_get("actor_eua_user_id")?,
        feedback: row.try_get("feedback")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl IntakeStore for SqliteStore {
    async fn fetch_system_intake(&self, id: Uuid) -> Result<SystemIntake, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {INTAKE_COLUMNS} FROM system_intakes WHERE id = ?1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: "system intake",
            id: id.to_string(),
        })?;
        intake_from_row(&row)
    }

    async fn update_system_intake(
        &self,
        intake: &SystemIntake,
        expected_status: SystemIntakeStatus,
    ) -> Result<SystemIntake, StoreError> {
        let result = sqlx::query(
            "UPDATE system_intakes SET \
             eua_user_id = ?1, requester = ?2, component = ?3, business_owner = ?4, \
             business_owner_component = ?5, project_name = ?6, status = ?7, request_type = ?8, \
             alfabet_id = ?9, lifecycle_id = ?10, grt_review_email_body = ?11, \
             updated_at = ?12, submitted_at = ?13 \
             WHERE id = ?14 AND status = ?15",
        )
        .bind(&intake.eua_user_id)
        .bind(&intake.requester)
        .bind(&intake.component)
        .bind(&intake.business_owner)
        .bind(&intake.business_owner_component)
        .bind(&intake.project_name)
        .bind(intake.status.as_str())
        .bind(intake.request_type.as_str())
        .bind(&intake.alfabet_id)
        .bind(&intake.lifecycle_id)
        .bind(&intake.grt_review_email_body)
        .bind(intake.updated_at)
        .bind(intake.submitted_at)
        .bind(intake.id.to_string())
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let current = self.fetch_system_intake(intake.id).await?;
            debug!(
                intake.id = %intake.id,
                expected = %expected_status,
                found = %current.status,
                "System intake update lost a status race"
            );
            return Err(StoreError::StaleStatus {
                resource: "system intake",
                id: intake.id.to_string(),
                expected: expected_status,
                found: current.status,
            });
        }

        self.fetch_system_intake(intake.id).await
    }
}

#[async_trait]
impl BusinessCaseStore for SqliteStore {
    async fn fetch_open_business_case(&self, intake_id: Uuid) -> Result<BusinessCase, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {BUSINESS_CASE_COLUMNS} FROM business_cases \
             WHERE system_intake_id = ?1 AND status = 'OPEN' \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(intake_id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: "business case",
            id: intake_id.to_string(),
        })?;

        self.hydrate(business_case_from_row(&row)?).await
    }

    async fn update_business_case(
        &self,
        business_case: &BusinessCase,
    ) -> Result<BusinessCase, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Ownership columns are not part of the update
        let result = sqlx::query(
            "UPDATE business_cases SET \
             status = ?1, project_name = ?2, requester = ?3, requester_phone_number = ?4, \
             business_owner = ?5, business_need = ?6, priority_alignment = ?7, \
             success_indicators = ?8, updated_at = ?9, initial_submitted_at = ?10, \
             last_submitted_at = ?11 \
             WHERE id = ?12",
        )
        .bind(business_case.status.as_str())
        .bind(&business_case.project_name)
        .bind(&business_case.requester)
        .bind(&business_case.requester_phone_number)
        .bind(&business_case.business_owner)
        .bind(&business_case.business_need)
        .bind(&business_case.priority_alignment)
        .bind(&business_case.success_indicators)
        .bind(business_case.updated_at.or(Some(Utc::now())))
        .bind(business_case.initial_submitted_at)
        .bind(business_case.last_submitted_at)
        .bind(business_case.id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                resource: "business case",
                id: business_case.id.to_string(),
            });
        }

        sqlx::query("DELETE FROM estimated_lifecycle_costs WHERE business_case_id = ?1")
            .bind(business_case.id.to_string())
            .execute(&mut *tx)
            .await?;
        for line in &business_case.lifecycle_cost_lines {
            insert_cost_line(&mut tx, business_case.id, line).await?;
        }
        tx.commit().await?;

        self.fetch_business_case_by_id(business_case.id).await
    }
}

#[async_trait]
impl ActionStore for SqliteStore {
    async fn create_action(&self, action: &Action) -> Result<Action, StoreError> {
        let mut created = action.clone();
        created.created_at = created.created_at.or(Some(Utc::now()));

        sqlx::query(
            "INSERT INTO actions \
             (id, intake_id, action_type, actor_name, actor_email, actor_eua_user_id, feedback, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(created.id.to_string())
        .bind(created.intake_id.map(|id| id.to_string()))
        .bind(created.action_type.as_str())
        .bind(&created.actor_name)
        .bind(&created.actor_email)
        .bind(&created.actor_eua_user_id)
        .bind(&created.feedback)
        .bind(created.created_at)
        .execute(&self.pool)
        .await?;

        Ok(created)
    }

    async fn fetch_actions_by_intake(&self, intake_id: Uuid) -> Result<Vec<Action>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, intake_id, action_type, actor_name, actor_email, actor_eua_user_id, \
             feedback, created_at FROM actions WHERE intake_id = ?1 ORDER BY created_at ASC",
        )
        .bind(intake_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(action_from_row).collect()
    }
}

#[async_trait]
impl MetricsSource for SqliteStore {
    async fn fetch_system_intake_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SystemIntakeMetrics, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {INTAKE_COLUMNS} FROM system_intakes \
             WHERE created_at IS NOT NULL OR submitted_at IS NOT NULL"
        ))
        .fetch_all(&self.pool)
        .await?;

        let intakes = rows
            .iter()
            .map(intake_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tally_intake_metrics(&intakes, start, end))
    }
}
