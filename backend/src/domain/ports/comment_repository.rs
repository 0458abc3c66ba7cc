//! Port abstraction for comment persistence.
use async_trait::async_trait;

use crate::domain::{Comment, CommentId, NewComment, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable, "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => InternalError, "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on any of `posts`, oldest first.
    async fn list_for_posts(&self, posts: &[PostId])
    -> Result<Vec<Comment>, CommentPersistenceError>;

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentPersistenceError>;

    /// Insert a comment; the store assigns its id.
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError>;

    /// Remove a comment. Returns `false` when absent.
    async fn delete(&self, id: CommentId) -> Result<bool, CommentPersistenceError>;
}
