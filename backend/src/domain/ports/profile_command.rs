//! Driving port for editing an author's own profile.

use async_trait::async_trait;

use crate::domain::{AuthorDetail, AuthorId, Error, Principal, ProfileSubmission};

/// Request to patch the profile of `author_id`.
///
/// Ownership is checked against the author identity, not the profile row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProfileRequest {
    pub principal: Principal,
    pub author_id: AuthorId,
    pub submission: ProfileSubmission,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply the patch and return the refreshed author page.
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<AuthorDetail, Error>;
}
