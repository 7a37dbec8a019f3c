//! Kiwi Tequila provider

use super::Provider;
use crate::config::ProviderKind;
use crate::models::{AirportIdentity, CabinClass, SortKey};
use crate::services::client::UpstreamClient;
use async_trait::async_trait;
use serde_json::Value;

/// Kiwi Provider
///
/// Tequila takes IATA codes directly, so resolution is only used when a
/// caller asks for it explicitly.
pub struct KiwiProvider {
    client: UpstreamClient,
}

impl KiwiProvider {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Provider for KiwiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kiwi
    }

    fn client(&self) -> &UpstreamClient {
        &self.client
    }

    fn cabin_value(&self, cabin: CabinClass) -> &'static str {
        match cabin {
            CabinClass::Economy => "M",
            CabinClass::PremiumEconomy => "W",
            CabinClass::Business => "C",
            CabinClass::First => "F",
        }
    }

    fn sort_value(&self, sort: SortKey) -> &'static str {
        match sort {
            SortKey::Best => "quality",
            SortKey::Price => "price",
            SortKey::Fastest => "duration",
        }
    }

    fn parse_identity(&self, code: &str, payload: &Value) -> Option<AirportIdentity> {
        let first = payload
            .get("locations")
            .and_then(Value::as_array)
            .and_then(|locations| locations.first())?;

        let sky_id = first
            .get("code")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| first.get("id").and_then(Value::as_str))?
            .to_string();
        let entity_id = first
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| sky_id.clone());
        let name = first
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| sky_id.clone());

        Some(AirportIdentity {
            code: code.to_string(),
            sky_id,
            entity_id,
            name,
        })
    }
}
