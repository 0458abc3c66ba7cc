//! Application settings loaded via OrthoConfig.
//!
//! Values come from `BLOG_*` environment variables, CLI flags or a config
//! file. Session cookie settings are read separately; see
//! [`backend::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

use backend::outbound::persistence::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("page size must be between 1 and {MAX_PAGE_SIZE}, got {0}")]
    PageSize(u32),
}

/// Runtime configuration for the blog server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Posts per listing page.
    pub page_size: Option<u32>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn page_size(&self) -> Result<u32, SettingsError> {
        match self.page_size.unwrap_or(DEFAULT_PAGE_SIZE) {
            size @ 1..=MAX_PAGE_SIZE => Ok(size),
            size => Err(SettingsError::PageSize(size)),
        }
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "BLOG_BIND_ADDR",
        "BLOG_DATABASE_URL",
        "BLOG_PAGE_SIZE",
        "BLOG_POOL_MAX_SIZE",
        "BLOG_RUN_MIGRATIONS",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("blog-backend")]).expect("config should load")
    }

    /// Every variable cleared except the given overrides.
    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.page_size().expect("default size"), DEFAULT_PAGE_SIZE);
        assert_eq!(settings.pool_max_size(), DEFAULT_MAX_CONNECTIONS);
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BLOG_BIND_ADDR", "127.0.0.1:9000"),
            ("BLOG_DATABASE_URL", "postgres://localhost/blog"),
            ("BLOG_PAGE_SIZE", "25"),
            ("BLOG_RUN_MIGRATIONS", "false"),
        ]));

        let settings = load();
        assert_eq!(settings.bind_addr().expect("address").port(), 9000);
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/blog")
        );
        assert_eq!(settings.page_size().expect("size"), 25);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn out_of_range_page_size_is_rejected() {
        let _guard = lock_env(env_with(&[("BLOG_PAGE_SIZE", "0")]));

        assert!(matches!(load().page_size(), Err(SettingsError::PageSize(0))));
    }
}
