use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "easi")]
#[command(about = "IT governance request workflow engine")]
#[command(long_about = "EASi moves system intake requests and business cases through IT governance review. \
                       Each action a requester or reviewer takes is recorded, applied and announced by email. \
                       Start with 'easi migrate' to prepare the database.")]
pub struct Cli {
    /// Configuration file to load instead of ./easi.toml
    #[arg(long, global = true, help = "Path to an easi.toml configuration file")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and apply pending migrations
    Migrate,
    /// Create a draft system intake for a requester
    CreateIntake {
        /// Directory (EUA) ID of the requester
        #[arg(long, help = "Directory ID of the requester who owns the intake")]
        eua_user_id: String,
        /// Requester display name
        #[arg(long, help = "Requester name shown on the intake")]
        requester: String,
        /// Project name
        #[arg(long, help = "Name of the project the request is for")]
        project_name: Option<String>,
    },
    /// Create a draft business case for a system intake
    CreateBusinessCase {
        /// Intake the business case belongs to
        #[arg(long, help = "ID of the system intake")]
        intake_id: uuid::Uuid,
        /// Requester phone number, 10 digits
        #[arg(long, help = "Requester phone number (10 digits)")]
        phone_number: Option<String>,
        /// Business owner
        #[arg(long, help = "Name of the business owner")]
        business_owner: Option<String>,
        /// Business need
        #[arg(long, help = "Problem the project addresses")]
        business_need: Option<String>,
        /// Preferred-solution cost per lifecycle year
        #[arg(long, help = "Estimated preferred-solution cost for each of the five years")]
        annual_cost: Option<i64>,
    },
    /// Apply a workflow action to a system intake
    Dispatch {
        /// Intake the action applies to
        #[arg(long, help = "ID of the system intake")]
        intake_id: uuid::Uuid,
        /// Action type, e.g. SUBMIT_INTAKE or READY_FOR_GRT
        #[arg(long, help = "Action type to apply")]
        action: String,
        /// Directory ID of the caller
        #[arg(long, help = "Directory ID of the person taking the action")]
        principal: String,
        /// Caller holds the Governance Review Team job code
        #[arg(long, help = "Act as a Governance Review Team member")]
        grt: bool,
        /// Reviewer feedback sent with review actions
        #[arg(long, help = "Feedback text included in the review email")]
        feedback: Option<String>,
    },
    /// List the actions recorded against a system intake
    Actions {
        /// Intake to list actions for
        #[arg(long, help = "ID of the system intake")]
        intake_id: uuid::Uuid,
        /// Print JSON instead of a table
        #[arg(long, help = "Print actions as JSON")]
        json: bool,
    },
    /// Show system intake throughput for a recent window
    Metrics {
        /// Window length in days ending now
        #[arg(long, default_value = "30", help = "Days of history to include")]
        days: i64,
        /// Print JSON instead of a summary
        #[arg(long, help = "Print the metrics digest as JSON")]
        json: bool,
    },
}
