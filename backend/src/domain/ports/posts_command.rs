//! Driving port for post and comment mutations.
//!
//! Every request carries the caller's [`Principal`]; the implementation runs
//! the ownership policy before touching the store.

use async_trait::async_trait;

use crate::domain::{
    CommentId, CommentSubmission, Error, PostDetail, PostId, PostSubmission, Principal,
};

/// Request to create a post owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    pub principal: Principal,
    pub submission: PostSubmission,
}

/// Request to replace (`PUT`) or patch (`PATCH`) an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPostRequest {
    pub principal: Principal,
    pub post_id: PostId,
    pub submission: PostSubmission,
}

/// Request to comment on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentOnPostRequest {
    pub principal: Principal,
    pub post_id: PostId,
    pub submission: CommentSubmission,
}

/// Request to delete a comment under a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCommentRequest {
    pub principal: Principal,
    pub post_id: PostId,
    pub comment_id: CommentId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    async fn create_post(&self, request: CreatePostRequest) -> Result<PostDetail, Error>;

    /// Full update; title and content are required.
    async fn replace_post(&self, request: EditPostRequest) -> Result<PostDetail, Error>;

    /// Partial update; any subset of fields.
    async fn patch_post(&self, request: EditPostRequest) -> Result<PostDetail, Error>;

    /// Delete a post and its comments.
    async fn delete_post(&self, principal: Principal, post_id: PostId) -> Result<(), Error>;

    /// Add a comment and return the parent post with every comment.
    async fn comment_on_post(&self, request: CommentOnPostRequest) -> Result<PostDetail, Error>;

    async fn delete_comment(&self, request: DeleteCommentRequest) -> Result<(), Error>;
}
