//! Authors API handlers.
//!
//! ```text
//! GET   /api/v1/authors
//! GET   /api/v1/authors/{id}
//! PATCH /api/v1/authors/{id}/profile   {"bio":"Hello","avatar":"avatars/ada.png"}
//! ```
//!
//! Authors themselves are read-only over HTTP; only the profile is editable.

use actix_web::{get, patch, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::UpdateProfileRequest;
use crate::domain::{AuthorDetail, AuthorId, Error, PostSummary, Principal, ProfileSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Profile patch body.
///
/// Omitting `bio` leaves it unchanged; `"bio": null` clears it.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "Writes about compilers.")]
    pub bio: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "avatars/ada.png")]
    pub avatar: Option<String>,
}

/// Distinguish an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<ProfileRequest> for ProfileSubmission {
    fn from(value: ProfileRequest) -> Self {
        Self {
            bio: value.bio,
            avatar: value.avatar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub bio: Option<String>,
    #[schema(example = "default_avatar.png")]
    pub avatar: String,
}

/// Post as listed on an author page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryResponse {
    pub id: i64,
    pub title: String,
    pub created: DateTime<Utc>,
    #[schema(example = "/api/v1/posts/7")]
    pub url: String,
    pub comments_count: u64,
}

impl From<PostSummary> for PostSummaryResponse {
    fn from(summary: PostSummary) -> Self {
        let url = summary.url();
        Self {
            id: summary.id.get(),
            title: summary.title.into(),
            created: summary.created,
            url,
            comments_count: summary.comments_count,
        }
    }
}

/// Author page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: i64,
    #[schema(example = "ada")]
    pub username: String,
    pub profile: ProfileResponse,
    /// Newest first.
    pub posts: Vec<PostSummaryResponse>,
}

impl From<AuthorDetail> for AuthorResponse {
    fn from(detail: AuthorDetail) -> Self {
        let AuthorDetail {
            author,
            profile,
            posts,
        } = detail;
        Self {
            id: author.id.get(),
            username: author.username.into(),
            profile: ProfileResponse {
                bio: profile.bio.map(String::from),
                avatar: profile.avatar.into(),
            },
            posts: posts.into_iter().map(PostSummaryResponse::from).collect(),
        }
    }
}

/// List every author, ordered by id.
#[utoipa::path(
    get,
    path = "/api/v1/authors",
    responses(
        (status = 200, description = "Authors", body = [AuthorResponse]),
        (status = 401, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["authors"],
    operation_id = "listAuthors",
    security((), ("SessionCookie" = []), ("Token" = []))
)]
#[get("/authors")]
pub async fn list_authors(
    state: web::Data<HttpState>,
    _principal: Principal,
) -> ApiResult<web::Json<Vec<AuthorResponse>>> {
    let authors = state.authors.list_authors().await?;
    Ok(web::Json(
        authors.into_iter().map(AuthorResponse::from).collect(),
    ))
}

/// Fetch one author page.
#[utoipa::path(
    get,
    path = "/api/v1/authors/{id}",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author", body = AuthorResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["authors"],
    operation_id = "getAuthor",
    security((), ("SessionCookie" = []), ("Token" = []))
)]
#[get("/authors/{id}")]
pub async fn get_author(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AuthorResponse>> {
    let detail = state
        .authors
        .get_author(AuthorId::new(path.into_inner()))
        .await?;
    Ok(web::Json(detail.into()))
}

/// Author records cannot be edited; use the profile route.
#[utoipa::path(
    patch,
    path = "/api/v1/authors/{id}",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 405, description = "Authors are read-only", body = ErrorSchema)
    ),
    tags = ["authors"],
    operation_id = "patchAuthor"
)]
#[patch("/authors/{id}")]
pub async fn patch_author(_path: web::Path<i64>) -> ApiResult<web::Json<AuthorResponse>> {
    Err(Error::method_not_allowed(
        "method \"PATCH\" not allowed; edit the profile instead",
    ))
}

/// Patch bio and/or avatar of the caller's own profile.
#[utoipa::path(
    patch,
    path = "/api/v1/authors/{id}/profile",
    params(("id" = i64, Path, description = "Author id")),
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Refreshed author page", body = AuthorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["authors"],
    operation_id = "updateProfile"
)]
#[patch("/authors/{id}/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
    payload: Result<web::Json<ProfileRequest>, actix_web::Error>,
) -> ApiResult<web::Json<AuthorResponse>> {
    principal.require_author()?;
    let author_id = AuthorId::new(path?.into_inner());
    let detail = state
        .profiles
        .update_profile(UpdateProfileRequest {
            principal,
            author_id,
            submission: payload?.into_inner().into(),
        })
        .await?;
    Ok(web::Json(detail.into()))
}

#[cfg(test)]
#[path = "authors_tests.rs"]
mod tests;
