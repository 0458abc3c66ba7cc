//! Port abstraction for author, credential and profile persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Author, AuthorId, Profile, StoredCredentials, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by author repository adapters.
    pub enum AuthorPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable, "author repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError, "author repository query failed: {message}",
        /// Another author already uses the username.
        DuplicateUsername { username: String } =>
            Conflict, "a user with username {username} already exists",
    }
}

/// Author account fields supplied at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub username: Username,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Insert an author together with a blank profile.
    async fn create(&self, author: &NewAuthor) -> Result<Author, AuthorPersistenceError>;

    /// Fetch an author by identifier.
    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>, AuthorPersistenceError>;

    /// Every author, ordered by id.
    async fn list(&self) -> Result<Vec<Author>, AuthorPersistenceError>;

    /// Credential record for a login attempt.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AuthorPersistenceError>;

    /// Stored password hash of an author.
    async fn password_hash(&self, id: AuthorId) -> Result<Option<String>, AuthorPersistenceError>;

    /// Remove an author and everything they own. Returns `false` when absent.
    async fn delete(&self, id: AuthorId) -> Result<bool, AuthorPersistenceError>;

    /// Profile of an author.
    async fn find_profile(&self, id: AuthorId) -> Result<Option<Profile>, AuthorPersistenceError>;

    /// Persist bio and avatar of an existing profile.
    async fn save_profile(&self, profile: &Profile) -> Result<(), AuthorPersistenceError>;
}
