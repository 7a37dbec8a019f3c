//! Normalized itinerary structures
//!
//! What every provider's response is flattened into

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Carrier name used when upstream omits it
pub const UNKNOWN_CARRIER: &str = "Unknown";

/// One direction of travel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub origin: String,
    pub destination: String,
    /// Local departure time
    pub departure: Option<NaiveDateTime>,
    /// Local arrival time
    pub arrival: Option<NaiveDateTime>,
    pub stops: u32,
    pub carrier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure: None,
            arrival: None,
            stops: 0,
            carrier: UNKNOWN_CARRIER.to_string(),
            duration_minutes: None,
        }
    }
}

/// Currency-tagged price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

/// One priced travel option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub outbound: Segment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbound: Option<Segment>,
    pub price: Price,
}

impl Itinerary {
    /// Highest stop count across both directions
    pub fn max_stops(&self) -> u32 {
        let inbound = self.inbound.as_ref().map(|s| s.stops).unwrap_or(0);
        self.outbound.stops.max(inbound)
    }
}

/// Sort itineraries ascending by price
pub fn sort_by_price(itineraries: &mut [Itinerary]) {
    itineraries.sort_by(|a, b| a.price.amount.total_cmp(&b.price.amount));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(amount: f64) -> Itinerary {
        Itinerary {
            id: None,
            outbound: Segment::default(),
            inbound: None,
            price: Price { amount, currency: "EUR".to_string() },
        }
    }

    #[test]
    fn test_sort_by_price() {
        let mut list = vec![priced(300.0), priced(99.5), priced(120.0)];
        sort_by_price(&mut list);
        let amounts: Vec<f64> = list.iter().map(|i| i.price.amount).collect();
        assert_eq!(amounts, vec![99.5, 120.0, 300.0]);
    }

    #[test]
    fn test_max_stops_considers_inbound() {
        let mut itinerary = priced(10.0);
        itinerary.outbound.stops = 1;
        itinerary.inbound = Some(Segment { stops: 2, ..Default::default() });
        assert_eq!(itinerary.max_stops(), 2);
    }
}
