//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use qwiksale::domain::AdminAllowlist;
use qwiksale::outbound::persistence::{DbPool, PoolConfig};
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings read from `QWIKSALE_*` variables and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "QWIKSALE")]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Comma-separated emails granted admin access.
    pub admin_emails: Option<String>,
    /// Comma-separated emails granted super admin access.
    pub superadmin_emails: Option<String>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Maximum pooled connections.
    pub db_max_connections: Option<u32>,
    /// Idle connections kept open.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] with `InvalidInput` for malformed values.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid QWIKSALE_BIND_ADDR '{raw}': {err}"),
            )
        })
    }

    /// Email allowlist for the admin guard.
    pub fn allowlist(&self) -> AdminAllowlist {
        AdminAllowlist::from_lists(
            self.admin_emails.as_deref(),
            self.superadmin_emails.as_deref(),
        )
    }

    /// Pool configuration for `database_url` with any overrides applied.
    pub fn pool_config(&self, database_url: impl Into<String>) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.db_max_connections {
            config = config.with_max_size(max_size);
        }
        if let Some(min_idle) = self.db_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(seconds) = self.db_connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(seconds));
        }
        config
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowlist: AdminAllowlist,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) services_table: bool,
}

impl ServerConfig {
    /// Construct a server configuration from session and binding settings.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            allowlist: AdminAllowlist::default(),
            db_pool: None,
            services_table: false,
        }
    }

    /// Attach the admin email allowlist.
    #[must_use]
    pub fn with_allowlist(mut self, allowlist: AdminAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Attach a database pool; `services_table` records whether the
    /// optional `services` table exists.
    ///
    /// Without a pool the server runs on fixture adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool, services_table: bool) -> Self {
        self.db_pool = Some(pool);
        self.services_table = services_table;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARIABLES: [&str; 7] = [
        "QWIKSALE_BIND_ADDR",
        "QWIKSALE_ADMIN_EMAILS",
        "QWIKSALE_SUPERADMIN_EMAILS",
        "QWIKSALE_RUN_MIGRATIONS",
        "QWIKSALE_DB_MAX_CONNECTIONS",
        "QWIKSALE_DB_MIN_IDLE",
        "QWIKSALE_DB_CONNECT_TIMEOUT_SECS",
    ];

    fn load(values: &[(&str, &str)]) -> ServerSettings {
        let _guard = lock_env(VARIABLES.iter().map(|name| {
            let value = values
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| (*value).to_owned());
            (*name, value)
        }));
        ServerSettings::load_from_iter([OsString::from("qwiksale")]).expect("config should load")
    }

    #[rstest]
    fn defaults_bind_every_interface() {
        let settings = load(&[]);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(!settings.run_migrations);
        assert_eq!(settings.pool_config("postgres://localhost/qwiksale").max_size(), 10);
    }

    #[rstest]
    fn overrides_are_respected() {
        let settings = load(&[
            ("QWIKSALE_BIND_ADDR", "127.0.0.1:9000"),
            ("QWIKSALE_RUN_MIGRATIONS", "true"),
            ("QWIKSALE_DB_MAX_CONNECTIONS", "4"),
            ("QWIKSALE_SUPERADMIN_EMAILS", "Owner@QwikSale.test"),
        ]);
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.run_migrations);
        assert_eq!(settings.pool_config("postgres://localhost/qwiksale").max_size(), 4);
        assert!(
            settings
                .allowlist()
                .level_for_email("owner@qwiksale.test")
                .is_some()
        );
    }

    #[rstest]
    fn malformed_bind_address_is_rejected() {
        let settings = load(&[("QWIKSALE_BIND_ADDR", "port eighty")]);
        let error = settings.bind_addr().expect_err("address is malformed");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }
}
