use anyhow::{bail, Result};
use chrono::{Duration, Utc};

use super::{open_store, Command};
use easi_workflow::{EasiConfig, FetchMetrics, Principal, RequestContext};

pub struct MetricsCommand {
    config: EasiConfig,
    days: i64,
    json: bool,
}

impl MetricsCommand {
    pub fn new(config: EasiConfig, days: i64, json: bool) -> Self {
        Self { config, days, json }
    }
}

impl Command for MetricsCommand {
    async fn execute(&self) -> Result<()> {
        if self.days <= 0 {
            bail!("--days must be positive, got {}", self.days);
        }

        let store = open_store(&self.config).await?;
        let end = Utc::now();
        let start = end - Duration::days(self.days);
        let ctx = RequestContext::new(Principal::new("cli"));

        let digest = FetchMetrics::new(store).fetch(&ctx, start, end).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&digest)?);
            return Ok(());
        }

        let metrics = &digest.system_intake_metrics;
        println!("📊 SYSTEM INTAKE METRICS - last {} days", self.days);
        println!("==========================================");
        println!("Started:                      {}", metrics.started);
        println!("Completed of started:         {}", metrics.completed_of_started);
        println!("Completed:                    {}", metrics.completed);
        println!("Completed within 5 days:      {}", metrics.completed_within_five_days);
        println!("Completed within 30 days:     {}", metrics.completed_within_thirty_days);
        println!("Funded:                       {}", metrics.funded);
        Ok(())
    }
}
