//! Provider module
//!
//! Defines the Provider trait and one implementation per response family.
//! Everything that differs between upstreams of the same family lives in the
//! provider table; the trait only covers value mapping and parsing.

pub mod kiwi;
pub mod skyscanner;

use crate::config::{ProviderConfig, ProviderKind};
use crate::models::api::PriceTableRequest;
use crate::models::{AirportIdentity, CabinClass, Itinerary, SearchRequest, SortKey};
use crate::services::client::UpstreamClient;
use crate::services::normalizer;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Resolved origin and destination identities
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlaces {
    pub origin: AirportIdentity,
    pub destination: AirportIdentity,
}

/// Provider trait for upstream flight APIs
///
/// Implementors supply the family-specific pieces; the HTTP calls and query
/// layout come from the provided methods and the provider table.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Response family handled by this provider
    fn kind(&self) -> ProviderKind;

    /// Client used for every upstream call
    fn client(&self) -> &UpstreamClient;

    /// Upstream value for a cabin class
    fn cabin_value(&self, cabin: CabinClass) -> &'static str;

    /// Upstream value for a sort key
    fn sort_value(&self, sort: SortKey) -> &'static str;

    /// Pick the first match out of an airport-search payload
    fn parse_identity(&self, code: &str, payload: &Value) -> Option<AirportIdentity>;

    /// Free-text airport search, relayed as-is
    async fn search_locations(&self, config: &ProviderConfig, query: &str) -> AppResult<Value> {
        let mut params = vec![(config.params.query.clone(), query.to_string())];
        params.extend(config.location_extras.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.client()
            .get_json(config, &config.endpoints.airport_search, &params)
            .await
    }

    /// Resolve a code to upstream identifiers
    ///
    /// Upstream failures and empty match lists both become resolution errors.
    async fn resolve_airport(&self, config: &ProviderConfig, code: &str) -> AppResult<AirportIdentity> {
        let payload = self.search_locations(config, code).await.map_err(|e| match e {
            AppError::Upstream { status, .. } => AppError::Resolution {
                code: code.to_string(),
                reason: format!("airport search returned status {}", status),
            },
            other => other,
        })?;

        let identity = self.parse_identity(code, &payload).ok_or_else(|| AppError::Resolution {
            code: code.to_string(),
            reason: "no matching airport".to_string(),
        })?;

        debug!("Resolved {} to {}", code, identity);
        Ok(identity)
    }

    /// Run a search and normalize the response
    async fn search_flights(
        &self,
        config: &ProviderConfig,
        request: &SearchRequest,
        places: Option<&ResolvedPlaces>,
    ) -> AppResult<Vec<Itinerary>> {
        let params = build_search_query(self, config, request, places);
        let path = config.endpoints.search_path(request.is_round_trip());

        let payload = self.client().get_json(config, path, &params).await?;
        Ok(normalizer::normalize(self.kind(), &payload, &request.currency))
    }

    /// Flexible-date price grid, relayed as-is
    async fn price_table(&self, config: &ProviderConfig, request: &PriceTableRequest) -> AppResult<Value> {
        let (Some(path), Some(names)) = (&config.endpoints.price_table, &config.price_table_params) else {
            return Err(AppError::NotFound("Price table is not supported by this provider".to_string()));
        };

        let mut params = vec![
            (names.origin.clone(), request.origin.clone()),
            (names.destination.clone(), request.destination.clone()),
            (names.from_date.clone(), config.date_format.format(request.from_date)),
            (names.currency.clone(), request.currency.clone()),
        ];
        if let (Some(name), Some(date)) = (&names.to_date, request.to_date) {
            params.push((name.clone(), config.date_format.format(date)));
        }

        self.client().get_json(config, path, &params).await
    }
}

/// Upstream query parameters for a search
///
/// Fields the provider has no parameter name for are left out. With resolved
/// places the sky id goes into the code parameter and the entity id into the
/// entity parameter; otherwise the raw code is sent.
pub fn build_search_query<P: Provider + ?Sized>(
    provider: &P,
    config: &ProviderConfig,
    request: &SearchRequest,
    places: Option<&ResolvedPlaces>,
) -> Vec<(String, String)> {
    let names = &config.params;
    let mut params: Vec<(String, String)> = Vec::new();
    let mut push = |name: &Option<String>, value: String| {
        if let Some(name) = name {
            params.push((name.clone(), value));
        }
    };

    match places {
        Some(places) => {
            push(&names.origin, places.origin.sky_id.clone());
            push(&names.destination, places.destination.sky_id.clone());
            push(&names.origin_entity, places.origin.entity_id.clone());
            push(&names.destination_entity, places.destination.entity_id.clone());
        }
        None => {
            push(&names.origin, request.origin.clone());
            push(&names.destination, request.destination.clone());
        }
    }

    if let Some(date) = request.departure_date {
        let formatted = config.date_format.format(date);
        push(&Some(names.departure_date.clone()), formatted.clone());
        push(&names.departure_date_to, formatted);
    }
    if let Some(date) = request.return_date {
        let formatted = config.date_format.format(date);
        push(&Some(names.return_date.clone()), formatted.clone());
        push(&names.return_date_to, formatted);
    }

    push(&Some(names.adults.clone()), request.adults.to_string());
    if let Some(children) = request.children {
        push(&names.children, children.to_string());
    }
    if let Some(infants) = request.infants {
        push(&names.infants, infants.to_string());
    }

    push(&names.cabin_class, provider.cabin_value(request.cabin_class).to_string());
    push(&names.currency, request.currency.clone());
    push(&names.market, request.market.clone());
    push(&names.locale, request.locale.clone());
    push(&names.country_code, request.country_code.clone());
    if let Some(max_stops) = request.max_stops {
        push(&names.max_stops, max_stops.to_string());
    }
    push(&names.sort, provider.sort_value(request.sort).to_string());

    params.extend(config.search_extras.iter().map(|(k, v)| (k.clone(), v.clone())));
    params
}

pub use kiwi::KiwiProvider;
pub use skyscanner::SkyscannerProvider;
