//! Flight search handlers
//!
//! Thin wrappers turning query strings and JSON bodies into adapter calls

use crate::handlers::AppState;
use crate::models::api::{FlexSearchBody, PriceTableQuery, SearchParams};
use crate::models::Itinerary;
use crate::services::BudgetSnapshot;
use crate::utils::error::AppResult;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// GET /api/search-flights response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchFlightsResponse {
    pub success: bool,
    pub data: Vec<Itinerary>,
    pub meta: SearchMeta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchMeta {
    pub provider: String,
    pub count: usize,
    /// Request budget, for quota-reporting providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<BudgetSnapshot>,
}

/// POST search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<Itinerary>,
}

/// Search one route from query parameters
///
/// GET /api/search-flights
pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchFlightsResponse>> {
    let Query(params) = params?;
    let request = params.to_request(&state.settings.search)?;

    let outcome = state
        .adapter
        .search_flights(params.provider.as_deref(), &request)
        .await?;

    Ok(Json(SearchFlightsResponse {
        success: true,
        meta: SearchMeta {
            provider: outcome.provider,
            count: outcome.itineraries.len(),
            requests: outcome.budget,
        },
        data: outcome.itineraries,
    }))
}

/// Search one route from a JSON body
///
/// POST /api/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchParams>, JsonRejection>,
) -> AppResult<Json<SearchResults>> {
    let Json(params) = body?;
    let request = params.to_request(&state.settings.search)?;

    let outcome = state
        .adapter
        .search_flights(params.provider.as_deref(), &request)
        .await?;

    Ok(Json(SearchResults {
        results: outcome.itineraries,
    }))
}

/// Search every departure/arrival combination
///
/// POST /api/search-flex
pub async fn search_flex(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FlexSearchBody>, JsonRejection>,
) -> AppResult<Json<SearchResults>> {
    let Json(body) = body?;
    debug!(
        "Flexible search: {} departures x {} arrivals",
        body.departures.len(),
        body.arrivals.len()
    );

    let request = body.search.to_request(&state.settings.search)?;
    let results = state
        .adapter
        .search_flexible(
            body.search.provider.as_deref(),
            &body.departures,
            &body.arrivals,
            &request,
        )
        .await?;

    Ok(Json(SearchResults { results }))
}

/// Flexible-date price grid
///
/// GET /api/price-table
pub async fn price_table(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceTableQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;
    let request = query.to_request(&state.settings.search)?;

    let grid = state
        .adapter
        .price_table(query.provider.as_deref(), &request)
        .await?;

    Ok(Json(grid))
}
