//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{AuthorId, NewPost, Post, PostId, PostSummary};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, posts};

/// Diesel-backed implementation of the [`PostRepository`] port.
///
/// Listings are ordered newest first with the id as tie-breaker so pages stay
/// stable when several posts share a timestamp.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PostPersistenceError {
    map_pool_error(error, PostPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn to_post(row: PostRow) -> Result<Post, PostPersistenceError> {
    Post::try_from(row).map_err(|err| PostPersistenceError::query(err.to_string()))
}

/// Convert a database count into the unsigned domain representation.
fn to_count(value: i64) -> Result<u64, PostPersistenceError> {
    u64::try_from(value)
        .map_err(|_| PostPersistenceError::query(format!("negative row count {value}")))
}

fn to_sql_window(value: u64) -> Result<i64, PostPersistenceError> {
    i64::try_from(value)
        .map_err(|_| PostPersistenceError::query(format!("window bound {value} out of range")))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn count(&self) -> Result<u64, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_count(total)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<PostRow> = posts::table
            .select(PostRow::as_select())
            .order_by((posts::created.desc(), posts::id.desc()))
            .offset(to_sql_window(offset)?)
            .limit(to_sql_window(limit)?)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_post).collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_post)
            .transpose()
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: PostRow = diesel::insert_into(posts::table)
            .values(NewPostRow {
                author_id: post.author.get(),
                title: post.title.as_ref(),
                content: post.content.as_ref(),
                image: post.image.as_ref(),
                created: post.created,
            })
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_post(row)
    }

    async fn update(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(posts::table.find(post.id.get()))
            .set(PostUpdate {
                title: post.title.as_ref(),
                content: post.content.as_ref(),
                image: post.image.as_ref(),
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }

    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(posts::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }

    async fn summaries_by_author(
        &self,
        author: AuthorId,
    ) -> Result<Vec<PostSummary>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<PostRow> = posts::table
            .filter(posts::author_id.eq(author.get()))
            .select(PostRow::as_select())
            .order_by((posts::created.desc(), posts::id.desc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let counts: HashMap<i64, i64> = comments::table
            .filter(comments::post_id.eq_any(&ids))
            .group_by(comments::post_id)
            .select((comments::post_id, diesel::dsl::count(comments::id)))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let comments_count = to_count(counts.get(&row.id).copied().unwrap_or_default())?;
                let post = to_post(row)?;
                Ok(PostSummary {
                    id: post.id,
                    title: post.title,
                    created: post.created,
                    comments_count,
                })
            })
            .collect()
    }
}
