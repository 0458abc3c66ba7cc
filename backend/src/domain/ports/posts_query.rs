//! Driving port for reading posts.
//!
//! Reads are open to every principal, so requests carry no identity.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, PostDetail, PostId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// One page of posts with their comments, newest post first.
    async fn list_posts(&self, page: PageRequest) -> Result<Page<PostDetail>, Error>;

    /// A single post with its comments.
    async fn get_post(&self, id: PostId) -> Result<PostDetail, Error>;
}
