//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod locations;
pub mod search;

use crate::config::{AppConfig, Settings};
use crate::middleware::logging::request_logging_middleware;
use crate::services::{FlightSearchAdapter, RequestBudget, UpstreamClient};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state
pub struct AppState {
    pub settings: Settings,
    pub adapter: Arc<FlightSearchAdapter>,
    /// Upstream call counter shared with the adapter's client
    pub budget: Arc<RequestBudget>,
    pub started_at: Instant,
}

/// Create application router
pub async fn create_router(settings: Settings, app_config: AppConfig) -> Result<Router> {
    let budget = Arc::new(RequestBudget::new(settings.upstream.request_limit));
    let client = UpstreamClient::new(settings.upstream.timeout, budget.clone())?;

    let app_config = match &settings.upstream.default_provider {
        Some(provider) => app_config
            .with_default_provider(provider)
            .with_context(|| format!("Invalid FLIGHT_PROVIDER '{}'", provider))?,
        None => app_config,
    };

    let adapter = Arc::new(FlightSearchAdapter::new(app_config, client));
    info!(
        "Providers available: {} (default '{}')",
        adapter.provider_ids().join(", "),
        adapter.default_provider()
    );

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        adapter,
        budget,
        started_at: Instant::now(),
    });

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings)?);

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/api/request-count", get(health::request_count))
        .route("/api/search-location", get(locations::search_location))
        .route("/api/autocomplete", get(locations::search_location))
        .route("/api/search-flights", get(search::search_flights))
        .route("/api/search", post(search::search))
        .route("/api/search-flex", post(search::search_flex))
        .route("/api/price-table", get(search::price_table))
        .layer(DefaultBodyLimit::max(settings.request.max_request_size))
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(app_state)
        .layer(middleware_stack);

    Ok(router)
}

/// CORS layer from settings
///
/// A bare `CorsLayer` adds no headers, which is what a disabled setting means.
fn cors_layer(settings: &Settings) -> Result<CorsLayer> {
    if !settings.security.cors_enabled {
        return Ok(CorsLayer::new());
    }

    let origins = &settings.security.allowed_origins;
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid allowed origin: {}", o)))
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
