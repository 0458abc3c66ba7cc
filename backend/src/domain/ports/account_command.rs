//! Driving port for account lifecycle: sign-up, token login/logout, account
//! deletion and token resolution.

use async_trait::async_trait;

use crate::domain::{Author, AuthorId, AuthToken, Error, LoginCredentials, Principal};

/// Raw sign-up payload. Validation happens inside the service so the field
/// errors match the rest of the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub author_id: AuthorId,
    pub token: AuthToken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an author and their blank profile.
    async fn sign_up(&self, request: SignUpRequest) -> Result<Author, Error>;

    /// Verify credentials and issue a fresh token, replacing any previous one.
    async fn log_in(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Revoke the caller's token.
    async fn log_out(&self, principal: Principal) -> Result<(), Error>;

    async fn current_author(&self, principal: Principal) -> Result<Author, Error>;

    /// Delete the caller's account after re-checking their password.
    async fn delete_account(
        &self,
        principal: Principal,
        current_password: String,
    ) -> Result<(), Error>;

    /// Map a presented token key to a principal; unknown keys are rejected.
    async fn resolve_token(&self, token: &AuthToken) -> Result<Principal, Error>;
}
