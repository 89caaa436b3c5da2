use anyhow::Result;
use uuid::Uuid;

use super::{open_store, Command};
use easi_workflow::models::{EstimatedLifecycleCost, LifecycleCostSolution, LifecycleCostYear};
use easi_workflow::services::traits::IntakeStore;
use easi_workflow::{BusinessCase, EasiConfig};

pub struct CreateBusinessCaseCommand {
    config: EasiConfig,
    intake_id: Uuid,
    phone_number: Option<String>,
    business_owner: Option<String>,
    business_need: Option<String>,
    annual_cost: Option<i64>,
}

impl CreateBusinessCaseCommand {
    pub fn new(
        config: EasiConfig,
        intake_id: Uuid,
        phone_number: Option<String>,
        business_owner: Option<String>,
        business_need: Option<String>,
        annual_cost: Option<i64>,
    ) -> Self {
        Self {
            config,
            intake_id,
            phone_number,
            business_owner,
            business_need,
            annual_cost,
        }
    }
}

impl Command for CreateBusinessCaseCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config).await?;
        let intake = store.fetch_system_intake(self.intake_id).await?;

        // Owner, requester and project come from the intake
        let mut case = BusinessCase::new(intake.id, &intake.eua_user_id);
        case.project_name = intake.project_name.clone();
        case.requester = Some(intake.requester.clone());
        case.requester_phone_number = self.phone_number.clone();
        case.business_owner = self.business_owner.clone();
        case.business_need = self.business_need.clone();
        if let Some(cost) = self.annual_cost {
            case.lifecycle_cost_lines = LifecycleCostYear::ALL
                .iter()
                .map(|year| EstimatedLifecycleCost::new(LifecycleCostSolution::Preferred, *year, cost))
                .collect();
        }
        let case = store.create_business_case(&case).await?;

        println!("💼 Created business case {}", case.id);
        println!("   Intake:     {}", case.system_intake_id);
        println!("   Cost lines: {}", case.lifecycle_cost_lines.len());
        Ok(())
    }
}
