use anyhow::Result;
use clap::Parser;

mod cli;

use cli::commands::{
    actions::ActionsCommand, create_business_case::CreateBusinessCaseCommand,
    create_intake::CreateIntakeCommand, dispatch::DispatchCommand, metrics::MetricsCommand,
    migrate::MigrateCommand, Command,
};
use cli::{Cli, Commands};
use easi_workflow::{init_telemetry, shutdown_telemetry, EasiConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    EasiConfig::load_env_file()?;
    let config = match &cli.config {
        Some(path) => EasiConfig::load_from(path)?,
        None => EasiConfig::load()?,
    };
    init_telemetry(&config.observability)?;

    let result = match cli.command {
        Some(Commands::Migrate) => MigrateCommand::new(config).execute().await,
        Some(Commands::CreateIntake {
            eua_user_id,
            requester,
            project_name,
        }) => {
            CreateIntakeCommand::new(config, eua_user_id, requester, project_name)
                .execute()
                .await
        }
        Some(Commands::CreateBusinessCase {
            intake_id,
            phone_number,
            business_owner,
            business_need,
            annual_cost,
        }) => {
            CreateBusinessCaseCommand::new(
                config,
                intake_id,
                phone_number,
                business_owner,
                business_need,
                annual_cost,
            )
            .execute()
            .await
        }
        Some(Commands::Dispatch {
            intake_id,
            action,
            principal,
            grt,
            feedback,
        }) => {
            DispatchCommand::new(config, intake_id, action, principal, grt, feedback)
                .execute()
                .await
        }
        Some(Commands::Actions { intake_id, json }) => {
            ActionsCommand::new(config, intake_id, json).execute().await
        }
        Some(Commands::Metrics { days, json }) => {
            MetricsCommand::new(config, days, json).execute().await
        }
        None => show_usage(),
    };

    shutdown_telemetry();
    result
}

fn show_usage() -> Result<()> {
    println!("🏛️  EASi - IT governance request workflow");
    println!();
    println!("To get started:");
    println!("  🗄️  easi migrate          # Prepare the database");
    println!("  📝 easi create-intake    # Start a request");
    println!("  💼 easi create-business-case # Draft a business case");
    println!("  🚀 easi dispatch         # Apply an action to a request");
    println!("  📜 easi actions          # Show a request's history");
    println!("  📊 easi metrics          # Intake throughput");
    println!();
    println!("💡 Run 'easi <command> --help' for options.");
    Ok(())
}
