// Request-scoped identity passed explicitly to every workflow operation

use crate::telemetry::generate_correlation_id;

/// Job code carried by Governance Review Team members
pub const GRT_JOB_CODE: &str = "EASI_D_GOVTEAM";

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Directory ID (EUA ID) of the caller
    pub id: String,
    pub job_codes: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_codes: Vec::new(),
        }
    }

    pub fn with_job_code(mut self, code: impl Into<String>) -> Self {
        self.job_codes.push(code.into());
        self
    }

    pub fn grt_reviewer(id: impl Into<String>) -> Self {
        Self::new(id).with_job_code(GRT_JOB_CODE)
    }

    pub fn allow_grt(&self) -> bool {
        self.job_codes.iter().any(|code| code == GRT_JOB_CODE)
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub principal: Principal,
    pub correlation_id: String,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            correlation_id: generate_correlation_id(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn principal_id(&self) -> &str {
        &self.principal.id
    }
}
