//! Driving port for reading author pages.

use async_trait::async_trait;

use crate::domain::{AuthorDetail, AuthorId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorsQuery: Send + Sync {
    /// Every author with profile and post summaries, ordered by id.
    async fn list_authors(&self) -> Result<Vec<AuthorDetail>, Error>;

    async fn get_author(&self, id: AuthorId) -> Result<AuthorDetail, Error>;
}
