//! Account service: sign-up, token login/logout and account removal.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AuthTokenRepository, AuthorRepository, LoginOutcome, NewAuthor,
    PasswordHasher, SignUpRequest,
};
use crate::domain::{
    AuthToken, Author, Error, LoginCredentials, NewPassword, Principal, Username, field_error,
};

const BAD_CREDENTIALS: &str = "unable to log in with provided credentials";

/// Service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<A, T> {
    authors: Arc<A>,
    tokens: Arc<T>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl<A, T> AccountService<A, T> {
    pub fn new(
        authors: Arc<A>,
        tokens: Arc<T>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            authors,
            tokens,
            hasher,
            clock,
        }
    }

    /// Hash `password` on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(Error::from)
    }

    /// Check `password` against `hash` on the blocking pool.
    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password check task failed: {err}")))?
            .map_err(Error::from)
    }
}

#[async_trait]
impl<A, T> AccountCommand for AccountService<A, T>
where
    A: AuthorRepository,
    T: AuthTokenRepository,
{
    async fn sign_up(&self, request: SignUpRequest) -> Result<Author, Error> {
        let username =
            Username::new(request.username).map_err(|err| field_error("username", &err))?;
        let password = NewPassword::new(&request.password, &username)
            .map_err(|err| field_error("password", &err))?;
        let password_hash = self.hash_password(password.expose()).await?;

        let author = self
            .authors
            .create(&NewAuthor {
                username,
                password_hash,
                date_joined: self.clock.utc(),
            })
            .await?;
        info!(author_id = %author.id, "author signed up");
        Ok(author)
    }

    async fn log_in(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(stored) = self
            .authors
            .find_credentials(credentials.username())
            .await?
        else {
            debug!("login for unknown username");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        };
        if !self
            .verify_password(credentials.password(), stored.password_hash)
            .await?
        {
            debug!(author_id = %stored.author_id, "login with wrong password");
            return Err(Error::unauthorized(BAD_CREDENTIALS));
        }

        let token = AuthToken::generate();
        self.tokens
            .replace(stored.author_id, &token.digest(), self.clock.utc())
            .await?;
        info!(author_id = %stored.author_id, "token issued");
        Ok(LoginOutcome {
            author_id: stored.author_id,
            token,
        })
    }

    async fn log_out(&self, principal: Principal) -> Result<(), Error> {
        let author = principal.require_author()?;
        self.tokens.revoke(author).await?;
        info!(author_id = %author, "token revoked");
        Ok(())
    }

    async fn current_author(&self, principal: Principal) -> Result<Author, Error> {
        let id = principal.require_author()?;
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))
    }

    async fn delete_account(
        &self,
        principal: Principal,
        current_password: String,
    ) -> Result<(), Error> {
        let id = principal.require_author()?;
        let hash = self
            .authors
            .password_hash(id)
            .await?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        if !self.verify_password(&current_password, hash).await? {
            return Err(Error::invalid_request("invalid password").with_details(json!({
                "field": "currentPassword",
                "code": "invalid_password",
            })));
        }

        self.authors.delete(id).await?;
        info!(author_id = %id, "account deleted");
        Ok(())
    }

    async fn resolve_token(&self, token: &AuthToken) -> Result<Principal, Error> {
        self.tokens
            .resolve(&token.digest())
            .await?
            .map(Principal::Authenticated)
            .ok_or_else(|| Error::unauthorized("invalid token"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
