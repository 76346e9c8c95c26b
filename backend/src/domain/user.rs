//! Marketplace user accounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The email address was not of the form `local@domain.tld`.
    #[error("email must look like local@domain.tld")]
    InvalidEmail,
    /// The role string is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
///
/// Schemas that embed it annotate the field with `value_type = String`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A lowercase email address.
///
/// # Examples
/// ```
/// use qwiksale::domain::Email;
///
/// let email = Email::new("  Admin@QwikSale.co.ke ").expect("valid email");
/// assert_eq!(email.as_ref(), "admin@qwiksale.co.ke");
/// assert!(Email::new("admin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = "email")]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and validate an address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = seed_data::normalise_email(raw.as_ref());
        if seed_data::is_plausible_email(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(UserValidationError::InvalidEmail)
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role stored on the user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular marketplace user.
    #[default]
    User,
    /// Moderator.
    Admin,
    /// Moderator who may also change roles.
    SuperAdmin,
}

impl Role {
    /// Database and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPERADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            "SUPERADMIN" | "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            _ => Err(UserValidationError::UnknownRole(s.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as seen by the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    /// Lowercase email address.
    pub email: Email,
    /// Display name.
    pub name: Option<String>,
    /// Public handle.
    pub username: Option<String>,
    /// Stored role.
    pub role: Role,
    /// Banned users cannot sign in or use the admin surface.
    pub banned: bool,
    /// Suspended users cannot publish listings.
    pub suspended: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

/// Filters for the admin users listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring over email, name and username.
    pub q: Option<String>,
    /// Exact role.
    pub role: Option<Role>,
}

/// Partial update applied to a user by an admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserChange {
    /// New role.
    pub role: Option<Role>,
    /// New banned flag.
    pub banned: Option<bool>,
    /// New suspended flag.
    pub suspended: Option<bool>,
}

impl UserChange {
    /// Whether the change sets nothing.
    pub const fn is_empty(&self) -> bool {
        self.role.is_none() && self.banned.is_none() && self.suspended.is_none()
    }

    /// Whether the change bans or suspends the target.
    pub fn restricts(&self) -> bool {
        self.banned == Some(true) || self.suspended == Some(true)
    }

    /// Drop fields that already match `account`.
    pub fn without_noops(self, account: &UserAccount) -> Self {
        Self {
            role: self.role.filter(|role| *role != account.role),
            banned: self.banned.filter(|banned| *banned != account.banned),
            suspended: self.suspended.filter(|suspended| *suspended != account.suspended),
        }
    }
}
