//! PostgreSQL-backed `AuthorRepository` implementation using Diesel ORM.
//!
//! Accounts and profiles live in separate tables; `create` writes both in one
//! transaction so an author never exists without a profile. Deleting an
//! author relies on `ON DELETE CASCADE` to remove their profile, posts,
//! comments and token.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{AuthorPersistenceError, AuthorRepository, NewAuthor};
use crate::domain::{Author, AuthorId, Profile, StoredCredentials};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AuthorRow, NewAuthorRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{authors, profiles};

/// Diesel-backed implementation of the [`AuthorRepository`] port.
#[derive(Clone)]
pub struct DieselAuthorRepository {
    pool: DbPool,
}

impl DieselAuthorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AuthorPersistenceError {
    map_pool_error(error, AuthorPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AuthorPersistenceError {
    map_diesel_error(
        error,
        AuthorPersistenceError::query,
        AuthorPersistenceError::connection,
    )
}

fn to_author(row: AuthorRow) -> Result<Author, AuthorPersistenceError> {
    Author::try_from(row).map_err(|err| AuthorPersistenceError::query(err.to_string()))
}

fn to_profile(row: ProfileRow) -> Result<Profile, AuthorPersistenceError> {
    Profile::try_from(row).map_err(|err| AuthorPersistenceError::query(err.to_string()))
}

#[async_trait]
impl AuthorRepository for DieselAuthorRepository {
    async fn create(&self, author: &NewAuthor) -> Result<Author, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row: AuthorRow = diesel::insert_into(authors::table)
                        .values(NewAuthorRow {
                            username: author.username.as_ref(),
                            password_hash: &author.password_hash,
                            date_joined: author.date_joined,
                        })
                        .returning(AuthorRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(profiles::table)
                        .values(ProfileRow::from(&Profile::blank(AuthorId::new(row.id))))
                        .execute(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    debug!(username = %author.username, "username already taken");
                    AuthorPersistenceError::duplicate_username(author.username.as_ref())
                } else {
                    diesel_error(err)
                }
            })?;
        to_author(row)
    }

    async fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        authors::table
            .find(id.get())
            .select(AuthorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_author)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Author>, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AuthorRow> = authors::table
            .select(AuthorRow::as_select())
            .order_by(authors::id.asc())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_author).collect()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<(i64, String)> = authors::table
            .filter(authors::username.eq(username))
            .select((authors::id, authors::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(|(id, password_hash)| StoredCredentials {
            author_id: AuthorId::new(id),
            password_hash,
        }))
    }

    async fn password_hash(&self, id: AuthorId) -> Result<Option<String>, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        authors::table
            .find(id.get())
            .select(authors::password_hash)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)
    }

    async fn delete(&self, id: AuthorId) -> Result<bool, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(authors::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_profile(&self, id: AuthorId) -> Result<Option<Profile>, AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        profiles::table
            .find(id.get())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_profile)
            .transpose()
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), AuthorPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = ProfileRow::from(profile);
        diesel::insert_into(profiles::table)
            .values(&row)
            .on_conflict(profiles::author_id)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}
