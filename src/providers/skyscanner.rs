//! Skyscanner-family provider
//!
//! Covers Sky-Scrapper and Flights Scraper Real-Time, both of which return
//! Skyscanner-shaped airport and itinerary payloads.

use super::Provider;
use crate::config::ProviderKind;
use crate::models::{AirportIdentity, CabinClass, SortKey};
use crate::services::client::UpstreamClient;
use async_trait::async_trait;
use serde_json::Value;

/// Skyscanner Provider
pub struct SkyscannerProvider {
    client: UpstreamClient,
}

impl SkyscannerProvider {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for SkyscannerProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Skyscanner
    }

    fn client(&self) -> &UpstreamClient {
        &self.client
    }

    fn cabin_value(&self, cabin: CabinClass) -> &'static str {
        cabin.as_str()
    }

    fn sort_value(&self, sort: SortKey) -> &'static str {
        match sort {
            SortKey::Best => "best",
            SortKey::Price => "cheapest",
            SortKey::Fastest => "fastest",
        }
    }

    fn parse_identity(&self, code: &str, payload: &Value) -> Option<AirportIdentity> {
        let first = payload
            .get("data")
            .and_then(Value::as_array)
            .and_then(|matches| matches.first())?;

        let field = |paths: &[&str]| {
            paths
                .iter()
                .find_map(|path| first.pointer(path))
                .and_then(|v| match v {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        };

        let sky_id = field(&[
            "/skyId",
            "/navigation/relevantFlightParams/skyId",
            "/presentation/skyId",
        ])?;
        let entity_id = field(&[
            "/entityId",
            "/navigation/relevantFlightParams/entityId",
            "/navigation/entityId",
        ])?;
        let name = field(&["/presentation/title", "/presentation/suggestionTitle"])
            .unwrap_or_else(|| sky_id.clone());

        Some(AirportIdentity {
            code: code.to_string(),
            sky_id,
            entity_id,
            name,
        })
    }
}
