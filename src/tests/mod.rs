//! Router-level tests
//!
//! Drive the full middleware stack without any upstream

#[cfg(test)]
mod router_tests {
    use crate::config::{AppConfig, Settings};
    use crate::handlers::create_router;
    use crate::middleware::logging::REQUEST_ID_HEADER;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use std::collections::HashMap;
    use tower::ServiceExt;

    async fn app_with(env: &[(&str, &str)]) -> Router {
        let env: HashMap<String, String> = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let settings = Settings::from_lookup(|key| env.get(key).cloned()).expect("Failed to create test settings");
        create_router(settings, AppConfig::builtin())
            .await
            .expect("Failed to create router")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = app_with(&[]).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["requests"]["count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = app_with(&[]).await;
        let request = Request::builder().uri("/api/nope").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_without_parameters() {
        let app = app_with(&[]).await;
        let request = Request::builder()
            .uri("/api/search-flights")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("Missing required parameters"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app_with(&[]).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let app = app_with(&[("MAX_REQUEST_SIZE", "16")]).await;
        let payload = r#"{"from": "LHR", "to": "JFK", "departureDate": "2025-06-01"}"#;
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .header("content-length", payload.len())
            .body(Body::from(payload))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported_media_type() {
        let app = app_with(&[]).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .body(Body::from(r#"{"from": "LHR", "to": "JFK", "departureDate": "2025-06-01"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_body_under_limit_reaches_handler() {
        let app = app_with(&[("MAX_REQUEST_SIZE", "4096")]).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"from": "LHR", "to": "", "departureDate": "2025-06-01"}"#))
            .unwrap();

        // blank destination fails validation inside the handler
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_flight_provider_override_must_exist() {
        let env: HashMap<String, String> = [("FLIGHT_PROVIDER".to_string(), "amadeus".to_string())].into();
        let settings = Settings::from_lookup(|key| env.get(key).cloned()).unwrap();
        assert!(create_router(settings, AppConfig::builtin()).await.is_err());
    }
}
