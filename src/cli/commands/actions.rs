use anyhow::Result;
use uuid::Uuid;

use super::{open_store, Command};
use easi_workflow::{EasiConfig, FetchActions};

pub struct ActionsCommand {
    config: EasiConfig,
    intake_id: Uuid,
    json: bool,
}

impl ActionsCommand {
    pub fn new(config: EasiConfig, intake_id: Uuid, json: bool) -> Self {
        Self {
            config,
            intake_id,
            json,
        }
    }
}

impl Command for ActionsCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config).await?;
        let actions = FetchActions {
            intakes: store.clone(),
            actions: store,
        }
        .for_intake(self.intake_id)
        .await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&actions)?);
            return Ok(());
        }

        println!("📜 Actions for system intake {}", self.intake_id);
        println!("==================================================");
        if actions.is_empty() {
            println!("   (none recorded)");
        }
        for action in &actions {
            let at = action
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!(
                "{at}  {:<32} {} <{}>",
                action.action_type.as_str(),
                action.actor_name,
                action.actor_email
            );
            if let Some(feedback) = &action.feedback {
                println!("    💬 {feedback}");
            }
        }
        Ok(())
    }
}
