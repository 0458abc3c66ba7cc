//! PostgreSQL-backed `AuthTokenRepository` implementation using Diesel ORM.
//!
//! `auth_tokens` is keyed by author, so issuing a token is an upsert that
//! overwrites whatever digest the author held before.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenPersistenceError, AuthTokenRepository};
use crate::domain::{AuthorId, TokenDigest};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the [`AuthTokenRepository`] port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AuthTokenPersistenceError {
    map_pool_error(error, AuthTokenPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AuthTokenPersistenceError {
    map_diesel_error(
        error,
        AuthTokenPersistenceError::query,
        AuthTokenPersistenceError::connection,
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn replace(
        &self,
        author: AuthorId,
        digest: &TokenDigest,
        created: DateTime<Utc>,
    ) -> Result<(), AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(auth_tokens::table)
            .values(NewAuthTokenRow {
                author_id: author.get(),
                digest: digest.as_ref(),
                created,
            })
            .on_conflict(auth_tokens::author_id)
            .do_update()
            .set((
                auth_tokens::digest.eq(excluded(auth_tokens::digest)),
                auth_tokens::created.eq(excluded(auth_tokens::created)),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AuthorId>, AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let author: Option<i64> = auth_tokens::table
            .filter(auth_tokens::digest.eq(digest.as_ref()))
            .select(auth_tokens::author_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(author.map(AuthorId::new))
    }

    async fn revoke(&self, author: AuthorId) -> Result<(), AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::delete(auth_tokens::table.find(author.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
