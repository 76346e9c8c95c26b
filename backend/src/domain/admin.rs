//! Who may use the admin surface, and at which level.

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::user::{Role, UserAccount};

/// Effective admin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AdminLevel {
    /// May moderate.
    Admin,
    /// May moderate and change roles.
    SuperAdmin,
}

/// An authenticated caller cleared for the admin surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    /// Caller's account.
    pub user: UserAccount,
    /// Effective level.
    pub level: AdminLevel,
}

impl AdminPrincipal {
    /// Whether the caller holds super admin rights.
    pub fn is_super(&self) -> bool {
        self.level == AdminLevel::SuperAdmin
    }
}

/// Emails granted admin rights regardless of their stored role.
///
/// # Examples
/// ```
/// use qwiksale::domain::{AdminAllowlist, AdminLevel};
///
/// let allowlist = AdminAllowlist::from_lists(Some("Ops@QwikSale.test, "), Some("root@qwiksale.test"));
/// assert_eq!(allowlist.level_for_email("ops@qwiksale.test"), Some(AdminLevel::Admin));
/// assert_eq!(allowlist.level_for_email("root@qwiksale.test"), Some(AdminLevel::SuperAdmin));
/// assert_eq!(allowlist.level_for_email("someone@qwiksale.test"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowlist {
    admins: HashSet<String>,
    super_admins: HashSet<String>,
}

impl AdminAllowlist {
    /// Build from comma separated lists; entries are trimmed and lowercased.
    pub fn from_lists(admins: Option<&str>, super_admins: Option<&str>) -> Self {
        Self {
            admins: split_emails(admins),
            super_admins: split_emails(super_admins),
        }
    }

    /// Level granted to `email` by the allowlists alone.
    pub fn level_for_email(&self, email: &str) -> Option<AdminLevel> {
        let email = email.trim().to_lowercase();
        if self.super_admins.contains(&email) {
            Some(AdminLevel::SuperAdmin)
        } else if self.admins.contains(&email) {
            Some(AdminLevel::Admin)
        } else {
            None
        }
    }

    /// Highest level granted by the stored role or the allowlists.
    pub fn level_for(&self, account: &UserAccount) -> Option<AdminLevel> {
        let from_role = match account.role {
            Role::SuperAdmin => Some(AdminLevel::SuperAdmin),
            Role::Admin => Some(AdminLevel::Admin),
            Role::User => None,
        };
        from_role.max(self.level_for_email(account.email.as_ref()))
    }
}

fn split_emails(raw: Option<&str>) -> HashSet<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
