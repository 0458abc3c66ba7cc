//! Posts API handlers.
//!
//! ```text
//! GET    /api/v1/posts?page=2
//! POST   /api/v1/posts                      {"title":"Hi","content":"..."}
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id}                 {"title":"Hi","content":"..."}
//! PATCH  /api/v1/posts/{id}                 {"content":"..."}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/comments        {"text":"Nice"}
//! DELETE /api/v1/posts/{id}/comments/{commentId}
//! ```
//!
//! Any `author` field in a request body is ignored; the owner is always the
//! caller. Mutating handlers take their body and path extractors as
//! `Result`s and reject anonymous callers before surfacing either error.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CommentOnPostRequest, CreatePostRequest, DeleteCommentRequest, EditPostRequest,
};
use crate::domain::{
    Comment, CommentId, CommentSubmission, Error, PostDetail, PostId, PostSubmission, Principal,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PostPageSchema};
use crate::inbound::http::state::HttpState;

/// Post body for create, replace and patch.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[schema(example = "Hello world")]
    pub title: Option<String>,
    pub content: Option<String>,
    /// Relative media path; defaults to `default_image.png` on create.
    #[schema(example = "posts/cover.png")]
    pub image: Option<String>,
}

impl From<PostRequest> for PostSubmission {
    fn from(value: PostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            image: value.image,
        }
    }
}

/// Comment body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: Option<String>,
}

/// Comment as nested inside a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
    /// Id of the commenting author.
    pub author: i64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.get(),
            text: comment.text.into(),
            created: comment.created,
            author: comment.author.get(),
        }
    }
}

/// Post with its comments, oldest comment first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    /// Id of the owning author.
    pub author: i64,
    pub image: String,
    pub comments: Vec<CommentResponse>,
}

impl From<PostDetail> for PostResponse {
    fn from(detail: PostDetail) -> Self {
        let PostDetail { post, comments } = detail;
        Self {
            id: post.id.get(),
            title: post.title.into(),
            content: post.content.into(),
            created: post.created,
            author: post.author.get(),
            image: post.image.into(),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
        }
    }
}

/// Listing query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number.
    #[param(example = "2")]
    pub page: Option<String>,
}

/// List posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of posts", body = PostPageSchema),
        (status = 401, description = "Invalid token", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security((), ("SessionCookie" = []), ("Token" = []))
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    _principal: Principal,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<PostResponse>>> {
    let request = PageRequest::parse(query.page.as_deref(), state.page_size)
        .map_err(|err| Error::not_found(format!("invalid page: {err}")))?;
    let page = state.posts.list_posts(request).await?;
    Ok(web::Json(page.map(PostResponse::from)))
}

/// Create a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Created", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    principal: Principal,
    payload: Result<web::Json<PostRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    principal.require_author()?;
    let payload = payload?;
    let detail = state
        .posts_command
        .create_post(CreatePostRequest {
            principal,
            submission: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(detail)))
}

/// Fetch a single post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost",
    security((), ("SessionCookie" = []), ("Token" = []))
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    _principal: Principal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let detail = state.posts.get_post(PostId::new(path.into_inner())).await?;
    Ok(web::Json(detail.into()))
}

/// Replace title, content and optionally image of an owned post.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "replacePost"
)]
#[put("/posts/{id}")]
pub async fn replace_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
    payload: Result<web::Json<PostRequest>, actix_web::Error>,
) -> ApiResult<web::Json<PostResponse>> {
    let detail = state
        .posts_command
        .replace_post(edit_request(principal, path, payload)?)
        .await?;
    Ok(web::Json(detail.into()))
}

/// Update any subset of an owned post's fields.
#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "patchPost"
)]
#[patch("/posts/{id}")]
pub async fn patch_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
    payload: Result<web::Json<PostRequest>, actix_web::Error>,
) -> ApiResult<web::Json<PostResponse>> {
    let detail = state
        .posts_command
        .patch_post(edit_request(principal, path, payload)?)
        .await?;
    Ok(web::Json(detail.into()))
}

fn edit_request(
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
    payload: Result<web::Json<PostRequest>, actix_web::Error>,
) -> ApiResult<EditPostRequest> {
    principal.require_author()?;
    let post_id = PostId::new(path?.into_inner());
    Ok(EditPostRequest {
        principal,
        post_id,
        submission: payload?.into_inner().into(),
    })
}

/// Delete an owned post together with its comments.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    principal.require_author()?;
    let post_id = PostId::new(path?.into_inner());
    state
        .posts_command
        .delete_post(principal, post_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Comment on a post and return the post with every comment.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = i64, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Parent post including the new comment", body = PostResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "commentOnPost"
)]
#[post("/posts/{id}/comments")]
pub async fn comment_on_post(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<i64>, actix_web::Error>,
    payload: Result<web::Json<CommentRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    principal.require_author()?;
    let post_id = PostId::new(path?.into_inner());
    let text = payload?.into_inner().text;
    let detail = state
        .posts_command
        .comment_on_post(CommentOnPostRequest {
            principal,
            post_id,
            submission: CommentSubmission { text },
        })
        .await?;
    Ok(HttpResponse::Created().json(PostResponse::from(detail)))
}

/// Delete an owned comment.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}/comments/{comment_id}",
    params(
        ("id" = i64, Path, description = "Post id"),
        ("comment_id" = i64, Path, description = "Comment id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found under this post", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deleteComment"
)]
#[delete("/posts/{id}/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    principal: Principal,
    path: Result<web::Path<(i64, i64)>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    principal.require_author()?;
    let (post_id, comment_id) = path?.into_inner();
    state
        .posts_command
        .delete_comment(DeleteCommentRequest {
            principal,
            post_id: PostId::new(post_id),
            comment_id: CommentId::new(comment_id),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
