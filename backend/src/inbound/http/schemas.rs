//! OpenAPI schema definitions for types that do not derive `ToSchema`.
//!
//! The domain error and the pagination envelope stay free of utoipa; these
//! wrappers mirror their serialised shape for the generated document.

use utoipa::ToSchema;

use crate::inbound::http::posts::PostResponse;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Field-level validation failures carry `details: {field, code}`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "this field may not be blank")]
    message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[schema(example = json!({"field": "title", "code": "blank"}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for a page of posts.
#[derive(ToSchema)]
#[schema(as = pagination::Page<PostResponse>)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PostPageSchema {
    /// Total number of posts.
    count: u64,
    /// Relative link to the following page.
    #[schema(example = "/api/v1/posts?page=3")]
    next: Option<String>,
    /// Relative link to the preceding page.
    #[schema(example = "/api/v1/posts")]
    previous: Option<String>,
    results: Vec<PostResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "method_not_allowed",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn post_page_schema_has_envelope_fields() {
        let schema_json = schema_to_json::<PostPageSchema>();
        for field in ["count", "next", "previous", "results"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }
}
