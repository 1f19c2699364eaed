//! Construction and serialisation of domain errors.

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
#[case(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("not yours"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("already in cart"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::new(ErrorCode::NotFound, "");
    assert_eq!(error.message(), "unspecified error");
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::internal("boom").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn trace_id_is_absent_outside_a_request() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let error = TraceId::scope(trace_id, async { Error::conflict("already subscribed") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialised_errors_keep_their_own_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("fixture is a UUID");
    let payload = json!({"code": "not_found", "message": "missing"});

    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_with_camel_case_trace_id(expected_trace_id: String) {
    let error = Error::invalid_request("duplicate ingredient")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "ingredients", "code": "duplicate_ingredient"}));

    let value = serde_json::to_value(&error).expect("serialise error");

    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "duplicate ingredient",
            "traceId": expected_trace_id,
            "details": {"field": "ingredients", "code": "duplicate_ingredient"},
        })
    );
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let payload = json!({"code": "conflict", "message": "  "});
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
