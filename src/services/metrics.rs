// Intake throughput digest for a reporting window

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::error;

use crate::context::RequestContext;
use crate::errors::{QueryOperation, WorkflowError};
use crate::models::MetricsDigest;
use crate::services::traits::MetricsSource;

pub struct FetchMetrics {
    pub source: Arc<dyn MetricsSource>,
}

impl FetchMetrics {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(
        &self,
        ctx: &RequestContext,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MetricsDigest, WorkflowError> {
        let mut metrics = self
            .source
            .fetch_system_intake_metrics(start, end)
            .await
            .map_err(|e| {
                error!(
                    correlation.id = %ctx.correlation_id,
                    error = %e,
                    "Failed to query system intake metrics"
                );
                WorkflowError::query(QueryOperation::Fetch, "system intake metrics", e)
            })?;
        metrics.start_time = Some(start);
        metrics.end_time = Some(end);

        Ok(MetricsDigest {
            system_intake_metrics: metrics,
        })
    }
}
