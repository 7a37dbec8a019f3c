//! Flight search adapter
//!
//! Routes searches to the configured provider, resolves airports when the
//! provider needs entity ids, and fans flexible searches out over every
//! origin/destination pair.

use crate::config::{AppConfig, ProviderConfig, ProviderKind};
use crate::models::api::{normalize_code, PriceTableRequest};
use crate::models::itinerary::sort_by_price;
use crate::models::{AirportIdentity, Itinerary, SearchRequest};
use crate::providers::{KiwiProvider, Provider, ResolvedPlaces, SkyscannerProvider};
use crate::services::budget::{BudgetSnapshot, RequestBudget};
use crate::services::client::UpstreamClient;
use crate::services::normalizer;
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::create_search_log_summary;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a single search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Provider id that served the search
    pub provider: String,
    pub itineraries: Vec<Itinerary>,
    /// Budget snapshot, for quota-reporting providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSnapshot>,
}

/// A provider id resolved against the table
struct Route<'a> {
    id: &'a str,
    config: &'a ProviderConfig,
    provider: Arc<dyn Provider>,
}

/// Flight Search Adapter
///
/// Holds one provider instance per response family and the provider table
pub struct FlightSearchAdapter {
    config: AppConfig,
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    budget: Arc<RequestBudget>,
}

impl FlightSearchAdapter {
    /// Create an adapter over a provider table
    pub fn new(config: AppConfig, client: UpstreamClient) -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn Provider>> = HashMap::new();

        for provider_config in config.providers.values() {
            let kind = provider_config.provider_type;
            providers.entry(kind).or_insert_with(|| -> Arc<dyn Provider> {
                match kind {
                    ProviderKind::Skyscanner => Arc::new(SkyscannerProvider::new(client.clone())),
                    ProviderKind::Kiwi => Arc::new(KiwiProvider::new(client.clone())),
                }
            });
        }

        info!(
            "Search adapter initialized with {} providers ({} families), default '{}'",
            config.providers.len(),
            providers.len(),
            config.default_provider
        );

        Self {
            budget: client.budget().clone(),
            config,
            providers,
        }
    }

    /// Provider id used when a request names none
    pub fn default_provider(&self) -> &str {
        &self.config.default_provider
    }

    pub fn provider_ids(&self) -> Vec<String> {
        self.config.provider_ids()
    }

    /// Current request budget
    pub fn budget(&self) -> BudgetSnapshot {
        self.budget.snapshot()
    }

    fn route(&self, provider_id: Option<&str>) -> AppResult<Route<'_>> {
        let requested = provider_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.config.default_provider.as_str());

        let (id, config) = self
            .config
            .providers
            .get_key_value(requested)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown provider '{}', expected one of: {}",
                    requested,
                    self.config.provider_ids().join(", ")
                ))
            })?;

        let provider = self.providers.get(&config.provider_type).cloned().ok_or_else(|| {
            AppError::Internal(format!("No provider instance for '{}'", id))
        })?;

        debug!("Routed request to provider '{}'", id);
        Ok(Route {
            id: id.as_str(),
            config,
            provider,
        })
    }

    /// Resolve one code to upstream identifiers
    pub async fn resolve_airport(&self, provider_id: Option<&str>, code: &str) -> AppResult<AirportIdentity> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(AppError::Validation("Missing required parameter: code".to_string()));
        }

        let route = self.route(provider_id)?;
        route.provider.resolve_airport(route.config, &code).await
    }

    /// Free-text airport search, passed through from the provider
    pub async fn search_locations(&self, provider_id: Option<&str>, query: &str) -> AppResult<Value> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Missing required parameter: query".to_string()));
        }

        let route = self.route(provider_id)?;
        route.provider.search_locations(route.config, query).await
    }

    /// Search one origin/destination pair
    ///
    /// Validation happens before any upstream call is made.
    pub async fn search_flights(&self, provider_id: Option<&str>, request: &SearchRequest) -> AppResult<SearchOutcome> {
        request.validate()?;
        let route = self.route(provider_id)?;

        debug!("Search request: {}", create_search_log_summary(request));
        let itineraries = self.search_with(&route, request).await?;
        info!(
            "Search {} -> {} via '{}' returned {} itineraries",
            request.origin,
            request.destination,
            route.id,
            itineraries.len()
        );

        Ok(SearchOutcome {
            provider: route.id.to_string(),
            itineraries,
            budget: route.config.reports_quota.then(|| self.budget.snapshot()),
        })
    }

    /// Search every origin/destination combination concurrently
    ///
    /// A pair whose upstream calls fail is logged and contributes nothing.
    /// Configuration problems fail the whole search. The aggregate is sorted
    /// by price.
    pub async fn search_flexible(
        &self,
        provider_id: Option<&str>,
        origins: &[String],
        destinations: &[String],
        request: &SearchRequest,
    ) -> AppResult<Vec<Itinerary>> {
        let origins = clean_codes(origins);
        let destinations = clean_codes(destinations);
        let (Some(first_origin), Some(first_destination)) = (origins.first(), destinations.first()) else {
            return Err(AppError::Validation(
                "At least one departure and one arrival airport are required".to_string(),
            ));
        };

        request.for_pair(first_origin, first_destination).validate()?;
        let route = self.route(provider_id)?;

        let pairs: Vec<(&String, &String)> = origins
            .iter()
            .flat_map(|o| destinations.iter().map(move |d| (o, d)))
            .collect();
        info!("Flexible search over {} pairs via '{}'", pairs.len(), route.id);

        let route = &route;
        let searches = pairs.into_iter().map(|(origin, destination)| {
            let pair_request = request.for_pair(origin, destination);
            async move {
                let result = self.search_with(route, &pair_request).await;
                (origin, destination, result)
            }
        });

        let mut results = Vec::new();
        for (origin, destination, result) in join_all(searches).await {
            match result {
                Ok(mut itineraries) => {
                    debug!("{} -> {}: {} itineraries", origin, destination, itineraries.len());
                    results.append(&mut itineraries);
                }
                Err(e) if pair_local(&e) => warn!("Flexible search {} -> {} failed: {}", origin, destination, e),
                Err(e) => return Err(e),
            }
        }

        sort_by_price(&mut results);
        Ok(results)
    }

    /// Flexible-date price grid
    pub async fn price_table(&self, provider_id: Option<&str>, request: &PriceTableRequest) -> AppResult<Value> {
        let route = self.route(provider_id)?;
        route.provider.price_table(route.config, request).await
    }

    async fn search_with(&self, route: &Route<'_>, request: &SearchRequest) -> AppResult<Vec<Itinerary>> {
        let places = if route.config.requires_entity_ids {
            let (origin, destination) = tokio::try_join!(
                route.provider.resolve_airport(route.config, &request.origin),
                route.provider.resolve_airport(route.config, &request.destination),
            )?;
            Some(ResolvedPlaces { origin, destination })
        } else {
            None
        };

        let itineraries = route
            .provider
            .search_flights(route.config, request, places.as_ref())
            .await?;

        let total = itineraries.len();
        let itineraries = normalizer::apply_max_stops(itineraries, request.max_stops);
        if itineraries.len() != total {
            debug!("Stop filter kept {} of {} itineraries", itineraries.len(), total);
        }

        Ok(itineraries)
    }
}

/// Trim, upper-case, drop blanks and duplicates, keeping first-seen order
fn clean_codes(codes: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes.iter().map(|c| normalize_code(c)) {
        if !code.is_empty() && !cleaned.contains(&code) {
            cleaned.push(code);
        }
    }
    cleaned
}

/// Failures confined to one flexible pair
fn pair_local(error: &AppError) -> bool {
    matches!(
        error,
        AppError::Upstream { .. } | AppError::Resolution { .. } | AppError::Network(_) | AppError::Serialization(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn adapter() -> (FlightSearchAdapter, Arc<RequestBudget>) {
        let budget = Arc::new(RequestBudget::new(100));
        let client = UpstreamClient::new(5, budget.clone()).unwrap();
        (FlightSearchAdapter::new(AppConfig::builtin(), client), budget)
    }

    #[test]
    fn test_clean_codes() {
        let codes = vec![" lhr".to_string(), "LGW".to_string(), "".to_string(), "LHR ".to_string(), "  ".to_string()];
        assert_eq!(clean_codes(&codes), vec!["LHR", "LGW"]);
    }

    #[test]
    fn test_pair_local_errors() {
        assert!(pair_local(&AppError::Upstream { status: 500, payload: Value::Null }));
        assert!(pair_local(&AppError::Resolution { code: "XXX".to_string(), reason: "no match".to_string() }));
        assert!(!pair_local(&AppError::Configuration("API key not configured".to_string())));
        assert!(!pair_local(&AppError::Internal("boom".to_string())));
    }

    #[test]
    fn test_route_default_and_unknown() {
        let (adapter, _) = adapter();
        assert_eq!(adapter.route(None).unwrap().id, "sky-scrapper");
        assert_eq!(adapter.route(Some("  ")).unwrap().id, "sky-scrapper");
        assert_eq!(adapter.route(Some("kiwi")).unwrap().config.provider_type, ProviderKind::Kiwi);
        assert!(matches!(adapter.route(Some("amadeus")), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_calls() {
        let (adapter, budget) = adapter();
        let request = SearchRequest {
            origin: "LHR".to_string(),
            ..Default::default()
        };

        let result = adapter.search_flights(None, &request).await;
        match result {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("destination"));
                assert!(msg.contains("departure date"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(budget.count(), 0);
    }

    #[tokio::test]
    async fn test_flexible_requires_candidates() {
        let (adapter, budget) = adapter();
        let request = SearchRequest::new("", "", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

        let result = adapter
            .search_flexible(None, &["LHR".to_string()], &[" ".to_string()], &request)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(budget.count(), 0);
    }

    #[tokio::test]
    async fn test_blank_location_query_rejected() {
        let (adapter, _) = adapter();
        assert!(matches!(
            adapter.search_locations(None, "   ").await,
            Err(AppError::Validation(_))
        ));
    }
}
