//! Inbound HTTP parameter structures
//!
//! Query strings and JSON bodies accepted by the public endpoints, and their
//! conversion into a [`SearchRequest`]. Several spellings are accepted for the
//! same field because older front ends used different names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::settings::SearchConfig;
use crate::models::search::{CabinClass, SearchRequest, SortKey};
use crate::utils::error::{AppError, AppResult, ErrorContext};

/// Search parameters (GET query string or POST body)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(alias = "origin", alias = "originSkyId")]
    pub from: Option<String>,
    #[serde(alias = "destination", alias = "destinationSkyId")]
    pub to: Option<String>,
    #[serde(alias = "date")]
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<u32>,
    #[serde(alias = "childrens")]
    pub children: Option<u32>,
    pub infants: Option<u32>,
    pub cabin_class: Option<String>,
    pub currency: Option<String>,
    pub market: Option<String>,
    pub locale: Option<String>,
    pub country_code: Option<String>,
    #[serde(alias = "stops")]
    pub max_stops: Option<u32>,
    #[serde(alias = "sort")]
    pub sort_by: Option<String>,
    /// Provider id from the provider table; default provider when absent
    pub provider: Option<String>,
}

impl SearchParams {
    /// Build a search request, filling gaps from configured defaults
    ///
    /// Missing origin/destination/date are left empty here; the adapter
    /// rejects them before talking to any upstream.
    pub fn to_request(&self, defaults: &SearchConfig) -> AppResult<SearchRequest> {
        let cabin_class = match non_blank(&self.cabin_class) {
            Some(value) => value.parse::<CabinClass>()?,
            None => CabinClass::default(),
        };
        let sort = match non_blank(&self.sort_by) {
            Some(value) => value.parse::<SortKey>()?,
            None => SortKey::default(),
        };

        Ok(SearchRequest {
            origin: normalize_code(self.from.as_deref().unwrap_or_default()),
            destination: normalize_code(self.to.as_deref().unwrap_or_default()),
            departure_date: parse_date("departureDate", &self.departure_date)?,
            return_date: parse_date("returnDate", &self.return_date)?,
            adults: self.adults.unwrap_or(1),
            children: self.children,
            infants: self.infants,
            cabin_class,
            currency: non_blank(&self.currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| defaults.currency.clone()),
            market: non_blank(&self.market).map(str::to_string).unwrap_or_else(|| defaults.market.clone()),
            locale: non_blank(&self.locale).map(str::to_string).unwrap_or_else(|| defaults.locale.clone()),
            country_code: non_blank(&self.country_code)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| defaults.country_code.clone()),
            max_stops: self.max_stops,
            sort,
        })
    }
}

/// Multi-airport search body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlexSearchBody {
    /// Candidate origin codes
    #[serde(default)]
    pub departures: Vec<String>,
    /// Candidate destination codes
    #[serde(default)]
    pub arrivals: Vec<String>,
    /// Shared search fields
    #[serde(flatten)]
    pub search: SearchParams,
}

/// Airport autocomplete query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationQuery {
    #[serde(alias = "term", alias = "q")]
    pub query: Option<String>,
    pub provider: Option<String>,
}

/// Flexible-date price grid query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTableQuery {
    #[serde(alias = "origin")]
    pub from: Option<String>,
    #[serde(alias = "destination")]
    pub to: Option<String>,
    #[serde(alias = "date")]
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub currency: Option<String>,
    pub provider: Option<String>,
}

/// Validated price grid request
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTableRequest {
    pub origin: String,
    pub destination: String,
    pub from_date: NaiveDate,
    pub to_date: Option<NaiveDate>,
    pub currency: String,
}

impl PriceTableQuery {
    /// Validate and fill defaults; the grid starts today when no date is given
    pub fn to_request(&self, defaults: &SearchConfig) -> AppResult<PriceTableRequest> {
        let origin = normalize_code(self.from.as_deref().unwrap_or_default());
        let destination = normalize_code(self.to.as_deref().unwrap_or_default());
        if origin.is_empty() || destination.is_empty() {
            return Err(AppError::Validation("Missing required parameters: from, to".to_string()));
        }

        let from_date = parse_date("fromDate", &self.from_date)?
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        Ok(PriceTableRequest {
            origin,
            destination,
            from_date,
            to_date: parse_date("toDate", &self.to_date)?,
            currency: non_blank(&self.currency)
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| defaults.currency.clone()),
        })
    }
}

/// Trim and upper-case an airport code
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse an optional `YYYY-MM-DD` date; blank values count as absent
fn parse_date(field: &str, value: &Option<String>) -> AppResult<Option<NaiveDate>> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .validation_context(&format!("Invalid {} '{}', expected YYYY-MM-DD", field, raw)),
    }
}
