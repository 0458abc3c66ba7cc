//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, CommentId, NewComment, PostId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

/// Diesel-backed implementation of the [`CommentRepository`] port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CommentPersistenceError {
    map_pool_error(error, CommentPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

fn to_comment(row: CommentRow) -> Result<Comment, CommentPersistenceError> {
    Comment::try_from(row).map_err(|err| CommentPersistenceError::query(err.to_string()))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_posts(
        &self,
        posts: &[PostId],
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = posts.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::post_id.eq_any(&ids))
            .select(CommentRow::as_select())
            .order_by((comments::created.asc(), comments::id.asc()))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter().map(to_comment).collect()
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        comments::table
            .find(id.get())
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(to_comment)
            .transpose()
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: CommentRow = diesel::insert_into(comments::table)
            .values(NewCommentRow {
                post_id: comment.post.get(),
                author_id: comment.author.get(),
                text: comment.text.as_ref(),
                created: comment.created,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        to_comment(row)
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let removed = diesel::delete(comments::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(removed > 0)
    }
}
