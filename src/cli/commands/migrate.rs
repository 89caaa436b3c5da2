use anyhow::Result;

use super::{open_store, Command};
use easi_workflow::EasiConfig;

pub struct MigrateCommand {
    config: EasiConfig,
}

impl MigrateCommand {
    pub fn new(config: EasiConfig) -> Self {
        Self { config }
    }
}

impl Command for MigrateCommand {
    async fn execute(&self) -> Result<()> {
        let store = open_store(&self.config).await?;
        // Already applied when auto_migrate is set; running again is a no-op
        store.migrate().await?;
        println!("✅ Database is up to date");
        Ok(())
    }
}
