use anyhow::Result;

use super::{open_store, Command};
use easi_workflow::{EasiConfig, SystemIntake};

pub struct CreateIntakeCommand {
    config: EasiConfig,
    eua_user_id: String,
    requester: String,
    project_name: Option<String>,
}

impl CreateIntakeCommand {
    pub fn new(
        config: EasiConfig,
        eua_user_id: String,
        requester: String,
        project_name: Option<String>,
    ) -> Self {
        Self {
            config,
            eua_user_id,
            requester,
            project_name,
        }
    }
}

impl Command for CreateIntakeCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config).await?;

        let mut intake = SystemIntake::new(&self.eua_user_id, &self.requester);
        intake.project_name = self.project_name.clone();
        let intake = store.create_system_intake(&intake).await?;

        println!("📝 Created system intake {}", intake.id);
        println!("   Requester: {} ({})", intake.requester, intake.eua_user_id);
        println!("   Status:    {}", intake.status);
        Ok(())
    }
}
