//! Airport search handler

use crate::handlers::AppState;
use crate::models::api::LocationQuery;
use crate::utils::error::AppResult;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

/// Free-text airport search, relayed from the provider
///
/// GET /api/search-location, GET /api/autocomplete
pub async fn search_location(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> AppResult<Json<Value>> {
    let Query(query) = query?;

    let payload = state
        .adapter
        .search_locations(query.provider.as_deref(), query.query.as_deref().unwrap_or_default())
        .await?;

    Ok(Json(payload))
}
