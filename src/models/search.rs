//! Search request data structures
//!
//! The provider-independent shape of a flight search

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{AppError, AppResult};

/// Cabin class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::PremiumEconomy => "premium_economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl FromStr for CabinClass {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "economy" | "m" => Ok(CabinClass::Economy),
            "premium" | "premium_economy" | "premiumeconomy" | "w" => Ok(CabinClass::PremiumEconomy),
            "business" | "c" => Ok(CabinClass::Business),
            "first" | "f" => Ok(CabinClass::First),
            other => Err(AppError::Validation(format!("Unknown cabin class: {}", other))),
        }
    }
}

/// Result ordering requested from the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Best,
    Price,
    Fastest,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best" | "quality" => Ok(SortKey::Best),
            "price" | "cheapest" => Ok(SortKey::Price),
            "fastest" | "duration" => Ok(SortKey::Fastest),
            other => Err(AppError::Validation(format!("Unknown sort key: {}", other))),
        }
    }
}

/// A normalized flight search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Origin airport or city code as entered by the user
    pub origin: String,
    /// Destination airport or city code as entered by the user
    pub destination: String,
    /// Outbound date
    pub departure_date: Option<NaiveDate>,
    /// Inbound date, present for round trips
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub children: Option<u32>,
    pub infants: Option<u32>,
    pub cabin_class: CabinClass,
    /// ISO 4217 currency code
    pub currency: String,
    pub market: String,
    pub locale: String,
    pub country_code: String,
    /// Drop itineraries with more stops than this
    pub max_stops: Option<u32>,
    pub sort: SortKey,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: None,
            return_date: None,
            adults: 1,
            children: None,
            infants: None,
            cabin_class: CabinClass::default(),
            currency: "USD".to_string(),
            market: "en-US".to_string(),
            locale: "en-US".to_string(),
            country_code: "US".to_string(),
            max_stops: None,
            sort: SortKey::default(),
        }
    }
}

impl SearchRequest {
    /// Create a one-way search with default passengers and locale
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, departure_date: NaiveDate) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            departure_date: Some(departure_date),
            ..Default::default()
        }
    }

    /// Whether a return leg was requested
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    /// Check the fields every upstream needs
    ///
    /// Return dates earlier than the departure date are passed through unchanged.
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();
        if self.origin.trim().is_empty() {
            missing.push("origin");
        }
        if self.destination.trim().is_empty() {
            missing.push("destination");
        }
        if self.departure_date.is_none() {
            missing.push("departure date");
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )));
        }

        if self.adults == 0 {
            return Err(AppError::Validation("At least one adult passenger is required".to_string()));
        }

        Ok(())
    }

    /// Copy of this request for another origin/destination pair
    pub fn for_pair(&self, origin: &str, destination: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            ..self.clone()
        }
    }
}

/// Upstream identifiers for an airport or city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirportIdentity {
    /// Code the identity was resolved from
    pub code: String,
    /// Short upstream code (e.g. "LOND")
    pub sky_id: String,
    /// Opaque upstream key (e.g. "27544008")
    pub entity_id: String,
    /// Display name
    pub name: String,
}

impl fmt::Display for AirportIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.sky_id, self.entity_id)
    }
}
