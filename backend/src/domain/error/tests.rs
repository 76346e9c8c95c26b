//! Tests for error construction, trace capture, and HTTP rendering.

use super::*;
use crate::domain::TRACE_ID_HEADER;
use actix_web::{ResponseError, body::to_bytes, http::StatusCode};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("connection string leaked: postgres://secret")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn conflict_case(expected_trace_id: String) -> Error {
    Error::conflict("carrier is banned")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"status": "BANNED"}))
}

#[rstest]
fn blank_messages_fall_back_to_the_code_description() {
    let err = Error::new(ErrorCode::Conflict, "   ");
    assert_eq!(err.message(), "conflict");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id(" ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::forbidden("no") }).await;
    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn decoding_ignores_the_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id.parse().expect("valid UUID");
    let payload = json!({"code": "not_found", "message": "gone"});
    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("valid payload")
    })
    .await;
    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_with_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("gone").with_trace_id("abc"))
        .expect("serialise error");
    assert_eq!(
        value,
        json!({"code": "not_found", "message": "gone", "traceId": "abc"})
    );
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("clash"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(error.status_code(), expected);
}

async fn render(error: Error, expected_status: StatusCode, expected_trace_id: &str) -> Error {
    let response = error.error_response();
    assert_eq!(response.status(), expected_status);

    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .expect("trace-id header is set")
        .to_str()
        .expect("trace-id is valid UTF-8");
    assert_eq!(trace_id, expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(
    #[from(internal_error_case)] internal_error: Error,
    expected_trace_id: String,
) {
    let payload = render(
        internal_error,
        StatusCode::INTERNAL_SERVER_ERROR,
        &expected_trace_id,
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_their_details(
    #[from(conflict_case)] conflict: Error,
    expected_trace_id: String,
) {
    let payload = render(conflict, StatusCode::CONFLICT, &expected_trace_id).await;
    assert_eq!(payload.message(), "carrier is banned");
    assert_eq!(payload.details(), Some(&json!({"status": "BANNED"})));
}

#[given("a blank error message")]
fn a_blank_error_message() -> (ErrorCode, String) {
    (ErrorCode::NotFound, "\t".to_owned())
}

#[when("the error is constructed")]
fn the_error_is_constructed(payload: (ErrorCode, String)) -> Result<Error, ErrorValidationError> {
    Error::try_new(payload.0, payload.1)
}

#[then("construction is rejected")]
fn construction_is_rejected(result: Result<Error, ErrorValidationError>) {
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn blank_messages_are_rejected() {
    let payload = a_blank_error_message();
    let result = the_error_is_constructed(payload);
    construction_is_rejected(result);
}
