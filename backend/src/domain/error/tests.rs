//! Tests for the domain error payload and its serialisation contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("no"), ErrorCode::Forbidden)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::method_not_allowed("nope"), ErrorCode::MethodNotAllowed)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("not yours") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("post not found")).expect("serialise");
    assert_eq!(value, json!({"code": "not_found", "message": "post not found"}));
}

#[rstest]
fn serialises_details_and_trace_id(expected_trace_id: String) {
    let error = Error::invalid_request("title must not be empty")
        .with_details(json!({"field": "title", "code": "empty"}))
        .with_trace_id(expected_trace_id.clone());
    let value = serde_json::to_value(error).expect("serialise");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "title must not be empty",
            "details": {"field": "title", "code": "empty"},
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "forbidden", "message": "  "}));
    assert!(result.is_err());
}
