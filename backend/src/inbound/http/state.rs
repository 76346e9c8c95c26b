//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminAccess, AdminUsersCommand, AdminUsersQuery, CarriersCommand, CarriersQuery,
    ListingsCommand, ListingsQuery, LoginService, MetricsQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// Public search and the admin listings view share [`Self::listings`]; public
/// handlers force the status filter themselves.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for `POST /api/auth/login`.
    pub login: Arc<dyn LoginService>,
    /// Admin guard backend.
    pub admin_access: Arc<dyn AdminAccess>,
    /// Listing queries across products and services.
    pub listings: Arc<dyn ListingsQuery>,
    /// Listing moderation.
    pub listings_command: Arc<dyn ListingsCommand>,
    /// Carrier directory.
    pub carriers: Arc<dyn CarriersQuery>,
    /// Carrier enforcement.
    pub carriers_command: Arc<dyn CarriersCommand>,
    /// User directory for admins.
    pub users: Arc<dyn AdminUsersQuery>,
    /// Role and restriction changes.
    pub users_command: Arc<dyn AdminUsersCommand>,
    /// Dashboard counts.
    pub metrics: Arc<dyn MetricsQuery>,
}
