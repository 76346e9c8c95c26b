//! Admin dashboard counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Window used for the "new in the last week" counters.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Raw counts gathered from the database.
///
/// Counters over optional tables are zero when the table is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricCounts {
    /// All users.
    pub users: u64,
    /// All products.
    pub products: u64,
    /// All services.
    pub services: u64,
    /// All carrier profiles.
    pub carriers: u64,
    /// Carriers neither banned nor currently suspended.
    pub active_carriers: u64,
    /// Banned carriers.
    pub banned_carriers: u64,
    /// Carriers with a suspension still running.
    pub suspended_carriers: u64,
    /// Saved favourites.
    pub favorites: u64,
    /// Unresolved abuse reports.
    pub open_reports: u64,
    /// Support tickets not yet closed.
    pub open_tickets: u64,
    /// Completed payments.
    pub successful_payments: u64,
    /// Users created inside the recent window.
    pub new_users_7d: u64,
    /// Products and services created inside the recent window.
    pub new_listings_7d: u64,
}

/// Dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminMetrics {
    /// Counters.
    #[serde(flatten)]
    pub counts: MetricCounts,
    /// When the counters were read.
    pub generated_at: DateTime<Utc>,
}
