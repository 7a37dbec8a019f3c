//! Error handling module unit tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use flightproxy::utils::error::helpers::*;
use flightproxy::utils::error::*;
use serde_json::json;

#[test]
fn test_app_error_status_codes() {
    let test_cases = vec![
        (AppError::Validation("test".to_string()), StatusCode::BAD_REQUEST),
        (AppError::NotFound("test".to_string()), StatusCode::NOT_FOUND),
        (AppError::Configuration("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        (resolution_error("LHR", "no match"), StatusCode::BAD_GATEWAY),
        (upstream_error(429, "{}"), StatusCode::TOO_MANY_REQUESTS),
        (upstream_error(403, "{}"), StatusCode::FORBIDDEN),
        (AppError::Internal("test".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (error, expected_status) in test_cases {
        assert_eq!(error.status_code(), expected_status, "{}", error);
    }
}

#[test]
fn test_invalid_upstream_status_becomes_bad_gateway() {
    let error = AppError::Upstream {
        status: 42,
        payload: json!(null),
    };
    assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_error_kinds() {
    let test_cases = vec![
        (AppError::Validation("test".to_string()), "validation_error"),
        (AppError::Configuration("test".to_string()), "configuration_error"),
        (resolution_error("JFK", "test"), "resolution_error"),
        (upstream_error(500, ""), "upstream_error"),
        (AppError::NotFound("test".to_string()), "not_found_error"),
        (AppError::Internal("test".to_string()), "internal_error"),
    ];

    for (error, expected) in test_cases {
        assert_eq!(error.error_kind(), expected);
    }
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::Validation("x".to_string()).is_client_error());
    assert!(upstream_error(404, "").is_client_error());
    assert!(!resolution_error("LHR", "x").is_client_error());
    assert!(!AppError::Configuration("x".to_string()).is_client_error());
}

#[test]
fn test_upstream_error_body() {
    let error = upstream_error(401, r#"{"message": "Invalid API key. Go to https://docs.rapidapi.com"}"#);
    let body = error.to_error_response();

    assert_eq!(body.status, Some(401));
    assert_eq!(
        body.details.unwrap()["message"],
        "Invalid API key. Go to https://docs.rapidapi.com"
    );
    assert!(body.error.contains("401"));
}

#[test]
fn test_resolution_error_body() {
    let body = resolution_error("XYZ", "no matching airport").to_error_response();

    assert!(body.error.contains("XYZ"));
    assert_eq!(body.details, Some(json!({ "code": "XYZ" })));
    assert!(body.status.is_none());
}

#[test]
fn test_error_response_serialization() {
    let body = AppError::Validation("Missing required parameters: origin".to_string()).to_error_response();
    let serialized = serde_json::to_value(&body).unwrap();

    // optional fields are omitted, not null
    assert_eq!(
        serialized,
        json!({ "error": "Request validation failed: Missing required parameters: origin" })
    );
}

#[test]
fn test_into_response_status() {
    let response = upstream_error(502, "Bad Gateway").into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = AppError::NotFound("price table".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_error_context() {
    let parsed: Result<u32, std::num::ParseIntError> = "abc".parse();
    let error = parsed.validation_context("Invalid adults").unwrap_err();
    match error {
        AppError::Validation(msg) => assert!(msg.starts_with("Invalid adults")),
        other => panic!("Expected validation error, got {:?}", other),
    }
}
