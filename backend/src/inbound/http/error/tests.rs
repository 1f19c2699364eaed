//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::conflict("recipe is already in favorites"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("only the author can modify this recipe"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn response_payload(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ASCII").to_owned());
    assert_eq!(header.as_deref(), expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let payload = response_payload(
        error,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("no tag selected")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "tags", "code": "empty_tags"}));

    let payload =
        response_payload(error, StatusCode::BAD_REQUEST, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.message(), "no tag selected");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "tags", "code": "empty_tags"}))
    );
}

#[rstest]
#[actix_web::test]
async fn conflict_keeps_its_code_under_bad_request() {
    let error = Error::conflict("already subscribed");

    let payload = response_payload(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.message(), "already subscribed");
}
