use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the EASi workflow service.
///
/// Every section falls back to its defaults, so an absent or partial
/// `easi.toml` still loads.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EasiConfig {
    /// Database settings
    pub database: DatabaseConfig,
    /// Outbound email settings
    pub email: EmailConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
    /// Local user directory (development only)
    pub directory: DirectoryConfig,
    /// Local system of record (development only)
    pub system_of_record: SystemOfRecordConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (SQLite file path or connection string)
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Enable automatic migrations
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://easi.db".to_string(),
            max_connections: 5,
            auto_migrate: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// Governance Review Team mailbox that receives submission notices
    pub grt_email: String,
    /// From address on outbound mail
    pub sender: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            grt_email: "grt@example.gov".to_string(),
            sender: "easi-noreply@example.gov".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level filter, e.g. "info" or "easi_workflow=debug"
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// One `[[directory.users]]` entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryUser {
    pub eua_user_id: String,
    pub common_name: String,
    pub email: String,
}

// Users are a list rather than a table keyed by ID: the config crate
// lowercases keys, and EUA IDs are matched case-sensitively.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub users: Vec<DirectoryUser>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemOfRecordConfig {
    /// Prefix for locally issued Alfabet IDs
    pub id_prefix: String,
}

impl Default for SystemOfRecordConfig {
    fn default() -> Self {
        Self {
            id_prefix: "000-0000".to_string(),
        }
    }
}

impl EasiConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (easi.toml)
    /// 3. Environment variables, e.g. `EASI_DATABASE__URL`
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("easi.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = Config::try_from(&EasiConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("EASI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
