//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/auth/users          {"username":"ada","password":"analytical-engine"}
//! GET    /api/v1/auth/users/me
//! DELETE /api/v1/auth/users/me       {"currentPassword":"analytical-engine"}
//! POST   /api/v1/auth/token/login    {"username":"ada","password":"analytical-engine"}
//! POST   /api/v1/auth/token/logout
//! ```
//!
//! Login returns an API token and also establishes a session cookie, so
//! browser clients and token clients share the same endpoints.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SignUpRequest;
use crate::domain::{
    Author, LoginCredentials, LoginValidationError, Principal, field_error, missing_field_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpBody {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "analytical-engine")]
    pub password: Option<String>,
}

impl TryFrom<SignUpBody> for SignUpRequest {
    type Error = crate::domain::Error;

    fn try_from(value: SignUpBody) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value
                .username
                .ok_or_else(|| missing_field_error("username"))?,
            password: value
                .password
                .ok_or_else(|| missing_field_error("password"))?,
        })
    }
}

/// Token login body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn login_field_error(err: LoginValidationError) -> crate::domain::Error {
    let field = match err {
        LoginValidationError::EmptyUsername => "username",
        LoginValidationError::EmptyPassword => "password",
    };
    field_error(field, &err)
}

/// Account deletion body.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub current_password: Option<String>,
}

/// Public account identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    #[schema(example = "ada")]
    pub username: String,
}

impl From<Author> for AccountResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id.get(),
            username: author.username.into(),
        }
    }
}

/// Issued API token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub auth_token: String,
}

/// Register a new author with a blank profile.
#[utoipa::path(
    post,
    path = "/api/v1/auth/users",
    request_body = SignUpBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/users")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpBody>,
) -> ApiResult<HttpResponse> {
    let request = SignUpRequest::try_from(payload.into_inner())?;
    let author = state.accounts.sign_up(request).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(author)))
}

/// The signed-in author.
#[utoipa::path(
    get,
    path = "/api/v1/auth/users/me",
    responses(
        (status = 200, description = "Current author", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentAuthor"
)]
#[get("/auth/users/me")]
pub async fn current_author(
    state: web::Data<HttpState>,
    principal: Principal,
) -> ApiResult<web::Json<AccountResponse>> {
    let author = state.accounts.current_author(principal).await?;
    Ok(web::Json(author.into()))
}

/// Delete the caller's account and everything it owns.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/users/me",
    request_body = DeleteAccountRequest,
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Wrong or missing password", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccount"
)]
#[delete("/auth/users/me")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    principal: Principal,
    session: SessionContext,
    payload: Result<web::Json<DeleteAccountRequest>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    principal.require_author()?;
    let current_password = payload?
        .into_inner()
        .current_password
        .ok_or_else(|| missing_field_error("currentPassword"))?;
    state
        .accounts
        .delete_account(principal, current_password)
        .await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Exchange credentials for an API token and a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "logIn",
    security([])
)]
#[post("/auth/token/login")]
pub async fn log_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(login_field_error)?;
    let outcome = state.accounts.log_in(credentials).await?;
    session.persist_author(outcome.author_id)?;
    Ok(web::Json(TokenResponse {
        auth_token: outcome.token.expose().to_owned(),
    }))
}

/// Revoke the caller's token and end the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "logOut"
)]
#[post("/auth/token/logout")]
pub async fn log_out(
    state: web::Data<HttpState>,
    principal: Principal,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.accounts.log_out(principal).await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
