//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{
    AccountCommand, AuthorsQuery, PostsCommand, PostsQuery, ProfileCommand,
};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub posts: Arc<dyn PostsQuery>,
    pub posts_command: Arc<dyn PostsCommand>,
    pub authors: Arc<dyn AuthorsQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub accounts: Arc<dyn AccountCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostsQuery>,
    pub posts_command: Arc<dyn PostsCommand>,
    pub authors: Arc<dyn AuthorsQuery>,
    pub profiles: Arc<dyn ProfileCommand>,
    pub accounts: Arc<dyn AccountCommand>,
    /// Number of posts per listing page.
    pub page_size: u32,
}

impl HttpState {
    /// Construct state using the default page size.
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_page_size(ports, DEFAULT_PAGE_SIZE)
    }

    /// Construct state listing `page_size` posts per page.
    pub fn with_page_size(ports: HttpStatePorts, page_size: u32) -> Self {
        let HttpStatePorts {
            posts,
            posts_command,
            authors,
            profiles,
            accounts,
        } = ports;
        Self {
            posts,
            posts_command,
            authors,
            profiles,
            accounts,
            page_size,
        }
    }
}
