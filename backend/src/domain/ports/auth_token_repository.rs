//! Port abstraction for API token storage.
//!
//! Adapters only ever see token digests; raw keys never reach storage.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AuthorId, TokenDigest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum AuthTokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable, "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError, "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Store `digest` as the author's only live token.
    async fn replace(
        &self,
        author: AuthorId,
        digest: &TokenDigest,
        created: DateTime<Utc>,
    ) -> Result<(), AuthTokenPersistenceError>;

    /// Author owning the token with `digest`.
    async fn resolve(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AuthorId>, AuthTokenPersistenceError>;

    /// Drop the author's token, if any.
    async fn revoke(&self, author: AuthorId) -> Result<(), AuthTokenPersistenceError>;
}
