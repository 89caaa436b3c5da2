use anyhow::Result;
use std::sync::Arc;

use easi_workflow::clock::SystemClock;
use easi_workflow::services::{GrtReviewerAuthorizer, RequesterAuthorizer, SubmitValidator};
use easi_workflow::{
    ConfigDirectory, EasiConfig, LocalSystemOfRecord, LoggingNotifier, SqliteStore,
    WorkflowDependencies,
};

pub mod actions;
pub mod create_business_case;
pub mod create_intake;
pub mod dispatch;
pub mod metrics;
pub mod migrate;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Open the configured SQLite store
pub async fn open_store(config: &EasiConfig) -> Result<Arc<SqliteStore>> {
    print!("🔄 Opening {}... ", config.database.url);
    std::io::Write::flush(&mut std::io::stdout())?;

    match SqliteStore::connect(
        &config.database.url,
        config.database.max_connections,
        config.database.auto_migrate,
    )
    .await
    {
        Ok(store) => {
            println!("✅");
            Ok(Arc::new(store))
        }
        Err(e) => {
            println!("❌");
            Err(e.into())
        }
    }
}

/// Wire the standard handlers over `store` and the local collaborators
pub fn local_dependencies(config: &EasiConfig, store: Arc<SqliteStore>) -> WorkflowDependencies {
    WorkflowDependencies {
        clock: Arc::new(SystemClock),
        intakes: store.clone(),
        business_cases: store.clone(),
        actions: store,
        directory: Arc::new(ConfigDirectory::new(&config.directory)),
        system_of_record: Arc::new(LocalSystemOfRecord::new(&config.system_of_record)),
        notifier: Arc::new(LoggingNotifier::new(&config.email)),
        requester_authorizer: Arc::new(RequesterAuthorizer),
        review_authorizer: Arc::new(GrtReviewerAuthorizer),
        validator: Arc::new(SubmitValidator),
    }
}
