//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed blog entities (authors, profiles,
//! posts, comments), the ownership policy that governs every mutation, and
//! the services that implement the driving ports. Nothing here knows about
//! HTTP or SQL; adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Principal / AccessPolicy / OwnerOrReadOnly: the authorisation decision.
//! - Author, Profile, Post, Comment and their validated field types.
//! - BlogService / AccountService: driving port implementations.

mod account_service;
mod auth;
mod author;
mod blog_service;
mod comment;
pub mod error;
mod policy;
pub mod ports;
mod post;
mod profile;
mod record_id;
mod trace_id;
mod validation;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, NewPassword, PASSWORD_MAX, PASSWORD_MIN,
    PasswordValidationError, StoredCredentials, TokenDigest,
};
pub use self::author::{
    Author, AuthorDetail, AuthorId, USERNAME_MAX, Username, UsernameValidationError,
};
pub use self::blog_service::BlogService;
pub use self::comment::{
    COMMENT_MAX, Comment, CommentId, CommentSubmission, CommentText, NewComment,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::policy::{
    Access, AccessPolicy, Decision, DenialReason, Owned, OwnerOrReadOnly, Principal,
};
pub use self::post::{
    CONTENT_MAX, DEFAULT_POST_IMAGE, NewPost, POSTS_PATH, Post, PostChanges, PostContent,
    PostDetail, PostDraft, PostId, PostSubmission, PostSummary, PostTitle, TITLE_MAX,
    default_post_image,
};
pub use self::profile::{
    BIO_MAX, Bio, DEFAULT_AVATAR, IMAGE_REF_MAX, ImageRef, ImageRefValidationError, Profile,
    ProfileChanges, ProfileSubmission,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldViolation, TextViolation, field_error, missing_field_error};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
