//! Port abstraction for post persistence.
use async_trait::async_trait;

use crate::domain::{AuthorId, NewPost, Post, PostId, PostSummary};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable, "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError, "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Total number of posts.
    async fn count(&self) -> Result<u64, PostPersistenceError>;

    /// One window of posts, newest first.
    async fn list(&self, offset: u64, limit: u64) -> Result<Vec<Post>, PostPersistenceError>;

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Insert a post; the store assigns its id.
    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError>;

    /// Persist title, content and image of an existing post.
    async fn update(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Remove a post and its comments. Returns `false` when absent.
    async fn delete(&self, id: PostId) -> Result<bool, PostPersistenceError>;

    /// Summaries of an author's posts, newest first.
    async fn summaries_by_author(
        &self,
        author: AuthorId,
    ) -> Result<Vec<PostSummary>, PostPersistenceError>;
}
