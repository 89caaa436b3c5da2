// EASi Workflow Library - IT governance request workflow engine
// This exposes the core components for testing and integration

pub mod clock;
pub mod config;
pub mod context;
pub mod errors;
pub mod local;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod telemetry;

// Re-export key types for easy access
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EasiConfig;
pub use context::{Principal, RequestContext, GRT_JOB_CODE};
pub use errors::{ErrorKind, StoreError, ValidationError, WorkflowError};
pub use local::{ConfigDirectory, LocalSystemOfRecord, LoggingNotifier};
pub use models::{
    Action, ActionType, BusinessCase, MetricsDigest, SystemIntake, SystemIntakeStatus, UserInfo,
};
pub use observability::{create_action_span, workflow_metrics, WorkflowMetrics};
pub use services::{
    ActionDispatcher, ActionHandler, FetchActions, FetchMetrics, WorkflowDependencies,
};
pub use storage::MemoryStore;
#[cfg(feature = "database")]
pub use storage::SqliteStore;
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
