//! File-based configuration loading
//!
//! Loads the upstream provider table from a JSON file. Each provider row
//! names the upstream parameter for every search field, the date format,
//! endpoint paths and auth headers. Built-in rows cover Sky-Scrapper,
//! Flights Scraper Real-Time and Kiwi Tequila.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::utils::error::{AppError, AppResult};

/// Response family of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Skyscanner-shaped responses (Sky-Scrapper, Flights Scraper Real-Time)
    Skyscanner,
    /// Kiwi Tequila responses
    Kiwi,
}

/// Wire format for dates sent upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    #[serde(rename = "iso")]
    Iso,
    /// `DD/MM/YYYY`
    #[serde(rename = "dmy")]
    DayMonthYear,
}

impl DateFormat {
    /// Render a date in this format
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
            DateFormat::DayMonthYear => date.format("%d/%m/%Y").to_string(),
        }
    }
}

/// Auth header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Header carrying the API key (e.g. "x-rapidapi-key", "apikey")
    pub key_header: String,
    /// Header carrying the RapidAPI host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
    /// Value for the host header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// Endpoint paths relative to the base URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub airport_search: String,
    pub one_way: String,
    pub round_trip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_table: Option<String>,
}

impl EndpointConfig {
    /// Search path for the trip type
    pub fn search_path(&self, round_trip: bool) -> &str {
        if round_trip {
            &self.round_trip
        } else {
            &self.one_way
        }
    }
}

/// Upstream parameter name for each search field
///
/// `None` means the upstream has no such parameter and the field is not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamNames {
    /// Free-text airport search
    pub query: String,
    /// Receives the sky id (or the raw code when nothing is resolved)
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Receives the resolved entity id
    pub origin_entity: Option<String>,
    pub destination_entity: Option<String>,
    pub departure_date: String,
    /// Upper bound of a date window; gets the same date as `departure_date`
    pub departure_date_to: Option<String>,
    pub return_date: String,
    pub return_date_to: Option<String>,
    pub adults: String,
    pub children: Option<String>,
    pub infants: Option<String>,
    pub cabin_class: Option<String>,
    pub currency: Option<String>,
    pub market: Option<String>,
    pub locale: Option<String>,
    pub country_code: Option<String>,
    pub max_stops: Option<String>,
    pub sort: Option<String>,
}

/// Parameter names for the price grid endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTableParams {
    pub origin: String,
    pub destination: String,
    pub from_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    pub currency: String,
}

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Response family
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,

    /// Base URL for the provider API
    pub base_url: String,

    /// API key (can be empty if using env var)
    #[serde(default)]
    pub api_key: String,

    /// Environment variable holding the API key
    #[serde(default)]
    pub api_key_env: String,

    pub auth: AuthConfig,

    #[serde(default)]
    pub date_format: DateFormat,

    /// Whether codes must be resolved to sky/entity ids before searching
    #[serde(default)]
    pub requires_entity_ids: bool,

    /// Whether responses are annotated with the request budget
    #[serde(default)]
    pub reports_quota: bool,

    pub endpoints: EndpointConfig,

    pub params: ParamNames,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_table_params: Option<PriceTableParams>,

    /// Static parameters added to every search call
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub search_extras: BTreeMap<String, String>,

    /// Static parameters added to every airport search call
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub location_extras: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// API key from the config or the configured environment variable
    pub fn api_key(&self) -> AppResult<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }

        if !self.api_key_env.is_empty() {
            if let Ok(key) = std::env::var(&self.api_key_env) {
                if !key.trim().is_empty() {
                    return Ok(key.trim().to_string());
                }
            }
            return Err(AppError::Configuration(format!(
                "API key not configured: set {}",
                self.api_key_env
            )));
        }

        Err(AppError::Configuration("API key not configured".to_string()))
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Application configuration loaded from JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Provider used when a request does not name one
    #[serde(default = "default_provider_id")]
    pub default_provider: String,

    /// Provider table, keyed by provider id
    #[serde(default = "builtin_providers")]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider_id() -> String {
    "sky-scrapper".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AppConfig {
    /// Built-in provider table
    pub fn builtin() -> Self {
        Self {
            default_provider: default_provider_id(),
            providers: builtin_providers(),
        }
    }

    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading provider configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| "Failed to parse config JSON")?;

        config.validate()?;

        debug!("Loaded {} providers", config.providers.len());
        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. $FLIGHTPROXY_CONFIG
    /// 2. ~/.config/flightproxy/flightproxy.json
    /// 3. ./flightproxy.json
    ///
    /// Falls back to the built-in provider table when none exists.
    pub fn load_default() -> Result<Self> {
        if let Ok(path) = std::env::var("FLIGHTPROXY_CONFIG") {
            return Self::load(Path::new(&path));
        }

        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".config").join("flightproxy").join("flightproxy.json");
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        let local_path = Path::new("flightproxy.json");
        if local_path.exists() {
            return Self::load(local_path);
        }

        info!("No provider configuration file found, using built-in providers");
        Ok(Self::builtin())
    }

    /// Replace the default provider, checking that it exists
    pub fn with_default_provider(mut self, provider_id: &str) -> Result<Self> {
        self.default_provider = provider_id.to_string();
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            anyhow::bail!("At least one provider must be configured");
        }

        if !self.providers.contains_key(&self.default_provider) {
            anyhow::bail!("Default provider '{}' is not configured", self.default_provider);
        }

        for (name, provider) in &self.providers {
            if !provider.base_url.starts_with("http") {
                anyhow::bail!("Invalid base URL for provider '{}': {}", name, provider.base_url);
            }

            if provider.auth.key_header.trim().is_empty() {
                anyhow::bail!("Provider '{}' must name an API key header", name);
            }

            let endpoints = &provider.endpoints;
            for (label, path) in [
                ("airportSearch", &endpoints.airport_search),
                ("oneWay", &endpoints.one_way),
                ("roundTrip", &endpoints.round_trip),
            ] {
                if path.trim().is_empty() {
                    anyhow::bail!("Provider '{}' has an empty {} endpoint", name, label);
                }
            }

            let params = &provider.params;
            if params.departure_date.is_empty() || params.return_date.is_empty() || params.adults.is_empty() {
                anyhow::bail!("Provider '{}' must name date and adults parameters", name);
            }

            if provider.requires_entity_ids {
                if params.origin.is_none() && params.origin_entity.is_none() {
                    anyhow::bail!("Provider '{}' has no parameter for the origin", name);
                }
                if params.destination.is_none() && params.destination_entity.is_none() {
                    anyhow::bail!("Provider '{}' has no parameter for the destination", name);
                }
            } else if params.origin.is_none() || params.destination.is_none() {
                anyhow::bail!("Provider '{}' must name origin and destination parameters", name);
            }

            if endpoints.price_table.is_some() && provider.price_table_params.is_none() {
                anyhow::bail!("Provider '{}' has a price table endpoint but no priceTableParams", name);
            }
        }

        Ok(())
    }

    /// Look up a provider row
    pub fn get_provider(&self, provider_id: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider_id)
    }

    /// Sorted provider ids
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn some(name: &str) -> Option<String> {
    Some(name.to_string())
}

fn rapidapi_auth(host: &str) -> AuthConfig {
    AuthConfig {
        key_header: "x-rapidapi-key".to_string(),
        host_header: some("x-rapidapi-host"),
        host: some(host),
    }
}

fn builtin_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();

    providers.insert("sky-scrapper".to_string(), ProviderConfig {
        provider_type: ProviderKind::Skyscanner,
        base_url: "https://sky-scrapper.p.rapidapi.com".to_string(),
        api_key: String::new(),
        api_key_env: "RAPIDAPI_KEY".to_string(),
        auth: rapidapi_auth("sky-scrapper.p.rapidapi.com"),
        date_format: DateFormat::Iso,
        requires_entity_ids: true,
        reports_quota: true,
        endpoints: EndpointConfig {
            airport_search: "/api/v1/flights/searchAirport".to_string(),
            one_way: "/api/v2/flights/searchFlights".to_string(),
            round_trip: "/api/v2/flights/searchFlights".to_string(),
            price_table: some("/api/v1/flights/getPriceCalendar"),
        },
        params: ParamNames {
            query: "query".to_string(),
            origin: some("originSkyId"),
            destination: some("destinationSkyId"),
            origin_entity: some("originEntityId"),
            destination_entity: some("destinationEntityId"),
            departure_date: "date".to_string(),
            departure_date_to: None,
            return_date: "returnDate".to_string(),
            return_date_to: None,
            adults: "adults".to_string(),
            children: some("childrens"),
            infants: some("infants"),
            cabin_class: some("cabinClass"),
            currency: some("currency"),
            market: some("market"),
            locale: None,
            country_code: some("countryCode"),
            max_stops: None,
            sort: some("sortBy"),
        },
        price_table_params: Some(PriceTableParams {
            origin: "originSkyId".to_string(),
            destination: "destinationSkyId".to_string(),
            from_date: "fromDate".to_string(),
            to_date: some("toDate"),
            currency: "currency".to_string(),
        }),
        search_extras: BTreeMap::new(),
        location_extras: BTreeMap::new(),
    });

    providers.insert("flights-scraper".to_string(), ProviderConfig {
        provider_type: ProviderKind::Skyscanner,
        base_url: "https://flights-scraper-real-time.p.rapidapi.com".to_string(),
        api_key: String::new(),
        api_key_env: "RAPIDAPI_KEY".to_string(),
        auth: rapidapi_auth("flights-scraper-real-time.p.rapidapi.com"),
        date_format: DateFormat::Iso,
        requires_entity_ids: true,
        reports_quota: true,
        endpoints: EndpointConfig {
            airport_search: "/flights/auto-complete".to_string(),
            one_way: "/flights/search-oneway".to_string(),
            round_trip: "/flights/search-roundtrip".to_string(),
            price_table: None,
        },
        params: ParamNames {
            query: "query".to_string(),
            origin: None,
            destination: None,
            origin_entity: some("fromEntityId"),
            destination_entity: some("toEntityId"),
            departure_date: "departDate".to_string(),
            departure_date_to: None,
            return_date: "returnDate".to_string(),
            return_date_to: None,
            adults: "adults".to_string(),
            children: some("children"),
            infants: some("infants"),
            cabin_class: some("cabinClass"),
            currency: some("currency"),
            market: some("market"),
            locale: some("locale"),
            country_code: None,
            max_stops: None,
            sort: some("sort"),
        },
        price_table_params: None,
        search_extras: BTreeMap::new(),
        location_extras: BTreeMap::new(),
    });

    providers.insert("kiwi".to_string(), ProviderConfig {
        provider_type: ProviderKind::Kiwi,
        base_url: "https://api.tequila.kiwi.com".to_string(),
        api_key: String::new(),
        api_key_env: "KIWI_API_KEY".to_string(),
        auth: AuthConfig {
            key_header: "apikey".to_string(),
            host_header: None,
            host: None,
        },
        date_format: DateFormat::DayMonthYear,
        requires_entity_ids: false,
        reports_quota: false,
        endpoints: EndpointConfig {
            airport_search: "/locations/query".to_string(),
            one_way: "/v2/search".to_string(),
            round_trip: "/v2/search".to_string(),
            price_table: None,
        },
        params: ParamNames {
            query: "term".to_string(),
            origin: some("fly_from"),
            destination: some("fly_to"),
            origin_entity: None,
            destination_entity: None,
            departure_date: "date_from".to_string(),
            departure_date_to: some("date_to"),
            return_date: "return_from".to_string(),
            return_date_to: some("return_to"),
            adults: "adults".to_string(),
            children: some("children"),
            infants: some("infants"),
            cabin_class: some("selected_cabins"),
            currency: some("curr"),
            market: None,
            locale: None,
            country_code: None,
            max_stops: some("max_stopovers"),
            sort: some("sort"),
        },
        price_table_params: None,
        search_extras: BTreeMap::from([("limit".to_string(), "50".to_string())]),
        location_extras: BTreeMap::from([
            ("location_types".to_string(), "airport".to_string()),
            ("limit".to_string(), "10".to_string()),
        ]),
    });

    providers
}
