//! Driving port for the admin dashboard.

use async_trait::async_trait;

use crate::domain::{AdminMetrics, Error};

/// Domain use-case port for dashboard counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsQuery: Send + Sync {
    /// Current counters.
    async fn dashboard(&self) -> Result<AdminMetrics, Error>;
}
