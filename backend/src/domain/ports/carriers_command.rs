//! Driving port for carrier enforcement.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CarrierProfile, EnforcementAction, Error};

/// Result of an enforcement action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnforcementOutcome {
    /// Carrier after the action.
    pub carrier: CarrierProfile,
    /// Whether anything was written.
    pub changed: bool,
}

/// Domain use-case port for enforcing moderation decisions on carriers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarriersCommand: Send + Sync {
    /// Resolve `target` (carrier id, user id or email) and apply `action`.
    async fn enforce(
        &self,
        target: &str,
        action: EnforcementAction,
    ) -> Result<EnforcementOutcome, Error>;
}
