//! Carrier profiles and the enforcement rules moderators apply to them.
//!
//! [`apply_enforcement`] is pure: it takes the current profile, the action
//! and the current time, and returns the profile to persist, or `None` when
//! the carrier is already in the requested state. Services use the `None`
//! case to skip the write and report `changed: false`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::{Email, UserId};

/// Default suspension length when neither `until` nor `days` is given.
pub const DEFAULT_SUSPENSION_DAYS: i64 = 7;
/// Longest suspension expressible through `days`.
pub const MAX_SUSPENSION_DAYS: i64 = 365;

/// Unknown carrier enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown carrier {field}: {value}")]
pub struct CarrierValueError {
    /// Name of the field as seen by clients.
    pub field: &'static str,
    /// Raw value that failed to parse.
    pub value: String,
}

/// Stored carrier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CarrierStatus {
    /// Accepting jobs.
    #[default]
    Active,
    /// Temporarily blocked until `suspendedUntil`.
    Suspended,
    /// Permanently blocked until unbanned.
    Banned,
}

impl CarrierStatus {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::Banned => "BANNED",
        }
    }
}

impl FromStr for CarrierStatus {
    type Err = CarrierValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "SUSPENDED" => Ok(Self::Suspended),
            "BANNED" => Ok(Self::Banned),
            _ => Err(CarrierValueError {
                field: "status",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CarrierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription tier a carrier planned for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CarrierTier {
    /// Entry tier.
    #[default]
    Basic,
    /// Middle tier.
    Gold,
    /// Top tier.
    Platinum,
}

impl CarrierTier {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl FromStr for CarrierTier {
    type Err = CarrierValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "GOLD" => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            _ => Err(CarrierValueError {
                field: "tier",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CarrierTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A carrier's profile as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarrierProfile {
    /// Carrier identifier.
    pub id: Uuid,
    /// Owning user.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Contact phone.
    pub phone: Option<String>,
    /// Home station or town.
    pub station: Option<String>,
    /// Planned subscription tier.
    pub tier: CarrierTier,
    /// Stored status.
    pub status: CarrierStatus,
    /// End of the current suspension.
    pub suspended_until: Option<DateTime<Utc>>,
    /// When the carrier was banned.
    pub banned_at: Option<DateTime<Utc>>,
    /// Why the carrier was banned.
    pub ban_reason: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl CarrierProfile {
    /// Status with lapsed suspensions treated as active.
    ///
    /// A suspension without an end date never lapses.
    pub fn effective_status(&self, now: DateTime<Utc>) -> CarrierStatus {
        match self.status {
            CarrierStatus::Banned => CarrierStatus::Banned,
            _ if self.banned_at.is_some() => CarrierStatus::Banned,
            CarrierStatus::Suspended
                if self.suspended_until.is_some_and(|until| until <= now) =>
            {
                CarrierStatus::Active
            }
            status => status,
        }
    }

    /// Copy with the stored status replaced by the effective one.
    pub fn normalised(mut self, now: DateTime<Utc>) -> Self {
        let status = self.effective_status(now);
        if status == CarrierStatus::Active {
            self.suspended_until = None;
        }
        self.status = status;
        self
    }
}

/// Carrier row for the admin listing, joined with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarrierSummary {
    /// Profile fields.
    #[serde(flatten)]
    pub carrier: CarrierProfile,
    /// Owner's email.
    pub user_email: Email,
    /// Owner's display name.
    pub user_name: Option<String>,
}

/// Filters for the admin carriers listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarrierFilter {
    /// Case-insensitive substring over owner email, owner name, phone and
    /// station.
    pub q: Option<String>,
    /// Effective status.
    pub status: Option<CarrierStatus>,
    /// Planned tier.
    pub tier: Option<CarrierTier>,
}

/// Moderator action against a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnforcementAction {
    /// Ban until further notice.
    Ban {
        /// Stored on the profile.
        reason: Option<String>,
    },
    /// Lift a ban.
    Unban,
    /// Suspend for a period.
    Suspend {
        /// Explicit end time; must be in the future.
        until: Option<DateTime<Utc>>,
        /// Length in days, `1..=365`.
        days: Option<i64>,
        /// Logged only.
        reason: Option<String>,
    },
    /// Lift a suspension.
    Unsuspend,
    /// Change the planned tier.
    Tier {
        /// Target tier.
        tier: CarrierTier,
    },
}

impl EnforcementAction {
    /// Path segment naming the action.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ban { .. } => "ban",
            Self::Unban => "unban",
            Self::Suspend { .. } => "suspend",
            Self::Unsuspend => "unsuspend",
            Self::Tier { .. } => "tier",
        }
    }

    /// Free-text reason, if the action carries one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ban { reason } | Self::Suspend { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Reasons an enforcement action cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnforcementError {
    /// The carrier is banned and must be unbanned first.
    #[error("carrier is banned; unban before suspending")]
    SuspendWhileBanned,
    /// Both `until` and `days` were given.
    #[error("provide either until or days, not both")]
    AmbiguousSuspension,
    /// `until` is not in the future.
    #[error("until must be in the future")]
    SuspensionInPast,
    /// `days` is outside `1..=365`.
    #[error("days must be between 1 and {MAX_SUSPENSION_DAYS}, got {days}")]
    SuspensionDaysOutOfRange {
        /// Requested length.
        days: i64,
    },
}

/// Compute the profile after `action`, or `None` when nothing changes.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use qwiksale::domain::{
///     CarrierProfile, CarrierStatus, CarrierTier, EnforcementAction, UserId, apply_enforcement,
/// };
/// use uuid::Uuid;
///
/// let now = Utc::now();
/// let carrier = CarrierProfile {
///     id: Uuid::new_v4(),
///     user_id: UserId::random(),
///     phone: None,
///     station: None,
///     tier: CarrierTier::Basic,
///     status: CarrierStatus::Active,
///     suspended_until: None,
///     banned_at: None,
///     ban_reason: None,
///     created_at: now,
/// };
/// let banned = apply_enforcement(&carrier, &EnforcementAction::Ban { reason: None }, now)
///     .expect("ban is allowed")
///     .expect("state changes");
/// assert_eq!(banned.status, CarrierStatus::Banned);
/// assert!(apply_enforcement(&banned, &EnforcementAction::Ban { reason: None }, now)
///     .expect("ban is allowed")
///     .is_none());
/// ```
pub fn apply_enforcement(
    profile: &CarrierProfile,
    action: &EnforcementAction,
    now: DateTime<Utc>,
) -> Result<Option<CarrierProfile>, EnforcementError> {
    let status = profile.effective_status(now);
    let mut next = profile.clone();
    match action {
        EnforcementAction::Ban { reason } => {
            if status == CarrierStatus::Banned {
                return Ok(None);
            }
            next.status = CarrierStatus::Banned;
            next.banned_at = Some(now);
            next.ban_reason = reason.clone();
            next.suspended_until = None;
        }
        EnforcementAction::Unban => {
            if status != CarrierStatus::Banned {
                return Ok(None);
            }
            next.status = CarrierStatus::Active;
            next.banned_at = None;
            next.ban_reason = None;
        }
        EnforcementAction::Suspend { until, days, .. } => {
            if status == CarrierStatus::Banned {
                return Err(EnforcementError::SuspendWhileBanned);
            }
            let end = suspension_end(*until, *days, now)?;
            if status == CarrierStatus::Suspended {
                return Ok(None);
            }
            next.status = CarrierStatus::Suspended;
            next.suspended_until = Some(end);
        }
        EnforcementAction::Unsuspend => {
            if status != CarrierStatus::Suspended {
                return Ok(None);
            }
            next.status = CarrierStatus::Active;
            next.suspended_until = None;
        }
        EnforcementAction::Tier { tier } => {
            if profile.tier == *tier {
                return Ok(None);
            }
            next.tier = *tier;
        }
    }
    Ok(Some(next))
}

fn suspension_end(
    until: Option<DateTime<Utc>>,
    days: Option<i64>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, EnforcementError> {
    match (until, days) {
        (Some(_), Some(_)) => Err(EnforcementError::AmbiguousSuspension),
        (Some(until), None) if until <= now => Err(EnforcementError::SuspensionInPast),
        (Some(until), None) => Ok(until),
        (None, days) => {
            let days = days.unwrap_or(DEFAULT_SUSPENSION_DAYS);
            if !(1..=MAX_SUSPENSION_DAYS).contains(&days) {
                return Err(EnforcementError::SuspensionDaysOutOfRange { days });
            }
            Ok(now + TimeDelta::days(days))
        }
    }
}
