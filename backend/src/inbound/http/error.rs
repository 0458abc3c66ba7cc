//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        error!(message = error.message(), "internal error returned to client");
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

/// Extractor failures raised by the handlers below carry a domain error and
/// keep it; anything else is logged and redacted.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        if let Some(domain) = err.as_error::<Error>() {
            return domain.clone();
        }
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Turn a rejected JSON body into a `400` with the parser's message.
///
/// Registered through `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        other => other.to_string(),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": "malformed_body" }))
        .into()
}

/// Unparseable path segments name no resource, so they are `404`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::not_found(err.to_string()).into()
}

/// Turn a malformed query string into a `400`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(err.to_string()).into()
}
