//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use pagination::DEFAULT_PAGE_SIZE;

use backend::inbound::http::health::StoreKind;
use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) page_size: u32,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Serve from PostgreSQL instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Store the server will read and write.
    #[must_use]
    pub fn store_kind(&self) -> StoreKind {
        match self.db_pool {
            Some(_) => StoreKind::Postgres,
            None => StoreKind::Memory,
        }
    }
}
