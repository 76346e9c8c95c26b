//! Driven port for dashboard counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::MetricCounts;

use super::define_port_error;

define_port_error! {
    /// Errors raised by metrics adapters.
    pub enum MetricsSourceError {
        /// Connection could not be established.
        Connection { message: String } => "metrics connection failed: {message}",
        /// A count over a required table failed.
        Query { message: String } => "metrics query failed: {message}",
    }
}

/// Port for reading dashboard counters.
///
/// Adapters report zero for counters whose table does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Counters as of `now`; "recent" counters start at `since`.
    async fn counts(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<MetricCounts, MetricsSourceError>;
}

/// Fixed counters used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMetricsSource(pub MetricCounts);

#[async_trait]
impl MetricsSource for FixtureMetricsSource {
    async fn counts(
        &self,
        _since: DateTime<Utc>,
        _now: DateTime<Utc>,
    ) -> Result<MetricCounts, MetricsSourceError> {
        Ok(self.0)
    }
}
