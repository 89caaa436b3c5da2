// Error taxonomy for the workflow engine and its collaborators

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::models::SystemIntakeStatus;

/// Persistence operation a query error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperation {
    Fetch,
    Post,
    Save,
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOperation::Fetch => f.write_str("fetch"),
            QueryOperation::Post => f.write_str("post"),
            QueryOperation::Save => f.write_str("save"),
        }
    }
}

/// Operation attempted against a third-party dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOperation {
    Fetch,
    Submit,
    Notify,
}

impl fmt::Display for ExternalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalOperation::Fetch => f.write_str("fetch"),
            ExternalOperation::Submit => f.write_str("submit"),
            ExternalOperation::Notify => f.write_str("notify"),
        }
    }
}

/// Errors raised by a request store or the audit log writer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} {id} changed concurrently: expected status {expected}, found {found}")]
    StaleStatus {
        resource: &'static str,
        id: String,
        expected: SystemIntakeStatus,
        found: SystemIntakeStatus,
    },

    #[error("business case must belong to an existing system intake")]
    IntakeMissing,

    #[error("{0}")]
    Invalid(String),

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Delivery failure from the notifier
#[derive(Debug, Error)]
#[error("email to {recipient} failed: {reason}")]
pub struct NotificationError {
    pub recipient: String,
    pub reason: String,
}

/// Field-level failures from business case validation
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("validation failed on {model}: {}", format_validations(.validations))]
pub struct ValidationError {
    pub model: &'static str,
    pub model_id: String,
    pub validations: BTreeMap<String, String>,
}

fn format_validations(validations: &BTreeMap<String, String>) -> String {
    validations
        .iter()
        .map(|(field, message)| format!("{field} {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn new(model: &'static str, model_id: impl Into<String>) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            validations: BTreeMap::new(),
        }
    }

    pub fn with_validation(&mut self, field: &str, message: &str) {
        self.validations
            .insert(field.to_string(), message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }
}

/// Coarse classification for the outward API layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    ResourceConflict,
    ResourceNotFound,
    Query,
    ExternalApi,
    Validation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::ResourceConflict => "resource_conflict",
            ErrorKind::ResourceNotFound => "resource_not_found",
            ErrorKind::Query => "query",
            ErrorKind::ExternalApi => "external_api",
            ErrorKind::Validation => "validation",
        }
    }
}

/// Every failure the workflow engine reports falls into one of these
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("unauthorized{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    Unauthorized { reason: Option<String> },

    #[error("conflict on {resource} {resource_id}: {message}")]
    ResourceConflict {
        resource: &'static str,
        resource_id: String,
        message: String,
    },

    #[error("{resource} {id} not found")]
    ResourceNotFound { resource: &'static str, id: String },

    #[error("could not {operation} {model}: {source}")]
    Query {
        operation: QueryOperation,
        model: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("{source_system} {operation} failed for {model} {model_id}: {message}")]
    ExternalApi {
        source_system: String,
        operation: ExternalOperation,
        model: &'static str,
        model_id: String,
        message: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Unauthorized { .. } => ErrorKind::Unauthorized,
            WorkflowError::ResourceConflict { .. } => ErrorKind::ResourceConflict,
            WorkflowError::ResourceNotFound { .. } => ErrorKind::ResourceNotFound,
            WorkflowError::Query { .. } => ErrorKind::Query,
            WorkflowError::ExternalApi { .. } => ErrorKind::ExternalApi,
            WorkflowError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn unauthorized() -> Self {
        WorkflowError::Unauthorized { reason: None }
    }

    pub fn conflict(
        resource: &'static str,
        resource_id: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        WorkflowError::ResourceConflict {
            resource,
            resource_id: resource_id.to_string(),
            message: message.into(),
        }
    }

    /// Classify a store failure for `operation` on `model`.
    ///
    /// A lost compare-and-swap is a conflict rather than a query failure.
    pub fn query(operation: QueryOperation, model: &'static str, source: StoreError) -> Self {
        if let StoreError::StaleStatus { resource, id, .. } = &source {
            return WorkflowError::ResourceConflict {
                resource: *resource,
                resource_id: id.clone(),
                message: source.to_string(),
            };
        }
        WorkflowError::Query {
            operation,
            model,
            source,
        }
    }

    pub fn external(
        source_system: impl Into<String>,
        operation: ExternalOperation,
        model: &'static str,
        model_id: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        WorkflowError::ExternalApi {
            source_system: source_system.into(),
            operation,
            model,
            model_id: model_id.to_string(),
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::ResourceConflict
    }
}
