//! Configuration module unit tests

use flightproxy::config::{AppConfig, DateFormat, ProviderKind, Settings};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
    let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn test_settings_from_environment() {
    let settings = settings_from(&[
        ("SERVER_HOST", "127.0.0.1"),
        ("SERVER_PORT", "8080"),
        ("UPSTREAM_TIMEOUT", "12"),
        ("REQUEST_LIMIT", "500"),
        ("FLIGHT_PROVIDER", "kiwi"),
        ("DEFAULT_CURRENCY", "eur"),
        ("DEFAULT_COUNTRY", "es"),
        ("ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ("CORS_ENABLED", "false"),
        ("LOG_FORMAT", "json"),
    ])
    .unwrap();

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.upstream.timeout, 12);
    assert_eq!(settings.upstream.request_limit, 500);
    assert_eq!(settings.upstream.default_provider.as_deref(), Some("kiwi"));
    assert_eq!(settings.search.currency, "EUR");
    assert_eq!(settings.search.country_code, "ES");
    assert_eq!(settings.security.allowed_origins, vec!["https://a.example", "https://b.example"]);
    assert!(!settings.security.cors_enabled);
    assert_eq!(settings.logging.format, "json");
}

#[test]
fn test_invalid_settings_rejected() {
    let cases: &[(&str, &str)] = &[
        ("SERVER_PORT", "0"),
        ("SERVER_PORT", "not-a-port"),
        ("UPSTREAM_TIMEOUT", "0"),
        ("REQUEST_LIMIT", "0"),
        ("DEFAULT_CURRENCY", "EURO"),
        ("MAX_REQUEST_SIZE", "0"),
        ("CORS_ENABLED", "maybe"),
        ("RUST_LOG", "loud"),
        ("LOG_FORMAT", "xml"),
    ];

    for (key, value) in cases {
        assert!(settings_from(&[(key, value)]).is_err(), "{}={} should be rejected", key, value);
    }
}

#[test]
fn test_blank_values_use_defaults() {
    let settings = settings_from(&[("SERVER_PORT", "  "), ("FLIGHT_PROVIDER", "")]).unwrap();
    assert_eq!(settings.server.port, 3000);
    assert!(settings.upstream.default_provider.is_none());
}

#[test]
fn test_dev_mode() {
    assert!(settings_from(&[("RUST_LOG", "debug")]).unwrap().is_dev_mode());
    assert!(!settings_from(&[]).unwrap().is_dev_mode());
}

#[test]
fn test_provider_file_overrides_builtins() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "defaultProvider": "scrapper-eu",
            "providers": {
                "scrapper-eu": {
                    "type": "skyscanner",
                    "baseUrl": "https://sky-scrapper.p.rapidapi.com",
                    "apiKeyEnv": "RAPIDAPI_KEY_EU",
                    "auth": {
                        "keyHeader": "x-rapidapi-key",
                        "hostHeader": "x-rapidapi-host",
                        "host": "sky-scrapper.p.rapidapi.com"
                    },
                    "requiresEntityIds": true,
                    "reportsQuota": true,
                    "endpoints": {
                        "airportSearch": "/api/v1/flights/searchAirport",
                        "oneWay": "/api/v2/flights/searchFlights",
                        "roundTrip": "/api/v2/flights/searchFlights"
                    },
                    "params": {
                        "query": "query",
                        "origin": "originSkyId",
                        "destination": "destinationSkyId",
                        "originEntity": "originEntityId",
                        "destinationEntity": "destinationEntityId",
                        "departureDate": "date",
                        "returnDate": "returnDate",
                        "adults": "adults",
                        "market": "market"
                    }
                }
            }
        }"#,
    )
    .unwrap();

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.provider_ids(), vec!["scrapper-eu"]);

    let provider = config.get_provider("scrapper-eu").unwrap();
    assert_eq!(provider.provider_type, ProviderKind::Skyscanner);
    assert_eq!(provider.date_format, DateFormat::Iso);
    assert!(provider.reports_quota);
    assert_eq!(provider.params.market.as_deref(), Some("market"));
    assert!(provider.params.cabin_class.is_none());
    assert!(provider.endpoints.price_table.is_none());
}

#[test]
fn test_price_table_endpoint_needs_params() {
    let mut config = AppConfig::builtin();
    let kiwi = config.providers.get_mut("kiwi").unwrap();
    kiwi.endpoints.price_table = Some("/v2/price-grid".to_string());

    assert!(config.validate().is_err());
}

#[test]
fn test_provider_without_origin_param_rejected() {
    let mut config = AppConfig::builtin();
    config.providers.get_mut("kiwi").unwrap().params.origin = None;

    assert!(config.validate().is_err());
}

#[test]
fn test_malformed_file_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();
    assert!(AppConfig::load(file.path()).is_err());
}

#[test]
fn test_builtin_round_trips_through_json() {
    let config = AppConfig::builtin();
    let json = serde_json::to_string(&config).unwrap();
    let parsed: AppConfig = serde_json::from_str(&json).unwrap();

    assert!(parsed.validate().is_ok());
    let kiwi = parsed.get_provider("kiwi").unwrap();
    assert_eq!(kiwi.date_format, DateFormat::DayMonthYear);
    assert_eq!(kiwi.location_extras.get("location_types").map(String::as_str), Some("airport"));
}
