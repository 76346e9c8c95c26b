//! Admin dashboard counters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::ports::{MetricsQuery, MetricsSource, MetricsSourceError};
use crate::domain::{AdminMetrics, Error, RECENT_WINDOW_DAYS};

fn map_source_error(error: MetricsSourceError) -> Error {
    match error {
        MetricsSourceError::Connection { message } => {
            Error::service_unavailable(format!("metrics unavailable: {message}"))
        }
        MetricsSourceError::Query { message } => {
            Error::internal(format!("metrics query failed: {message}"))
        }
    }
}

/// Service implementing [`MetricsQuery`].
#[derive(Clone)]
pub struct MetricsService<M: ?Sized> {
    source: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<M: ?Sized> MetricsService<M> {
    /// Create the service over a metrics source.
    pub fn new(source: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }
}

#[async_trait]
impl<M> MetricsQuery for MetricsService<M>
where
    M: MetricsSource + ?Sized,
{
    async fn dashboard(&self) -> Result<AdminMetrics, Error> {
        let now = self.clock.utc();
        let since = now - TimeDelta::days(RECENT_WINDOW_DAYS);
        let counts = self
            .source
            .counts(since, now)
            .await
            .map_err(map_source_error)?;
        Ok(AdminMetrics {
            counts,
            generated_at: now,
        })
    }
}
