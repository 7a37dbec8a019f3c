//! Itinerary normalizer
//!
//! Flattens provider-specific itinerary JSON into [`Itinerary`] values.
//! Every nested field is optional: a malformed itinerary gets defaults
//! (zero stops, "Unknown" carrier, zero price) instead of failing the batch.

use crate::config::ProviderKind;
use crate::models::itinerary::{Itinerary, Price, Segment, UNKNOWN_CARRIER};
use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

/// Normalize an upstream search payload
pub fn normalize(kind: ProviderKind, payload: &Value, currency: &str) -> Vec<Itinerary> {
    match kind {
        ProviderKind::Skyscanner => normalize_skyscanner(payload, currency),
        ProviderKind::Kiwi => normalize_kiwi(payload, currency),
    }
}

/// Skyscanner-shaped payload: `data.itineraries[].legs[]`
pub fn normalize_skyscanner(payload: &Value, currency: &str) -> Vec<Itinerary> {
    let Some(items) = payload
        .pointer("/data/itineraries")
        .or_else(|| payload.get("itineraries"))
        .and_then(Value::as_array)
    else {
        debug!("Skyscanner payload has no itineraries array");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| skyscanner_itinerary(item, currency))
        .collect()
}

fn skyscanner_itinerary(item: &Value, currency: &str) -> Itinerary {
    let legs = item.get("legs").and_then(Value::as_array);

    Itinerary {
        id: item.get("id").and_then(as_string),
        outbound: legs
            .and_then(|l| l.first())
            .map(skyscanner_leg)
            .unwrap_or_default(),
        inbound: legs.and_then(|l| l.get(1)).map(skyscanner_leg),
        price: Price {
            amount: item.pointer("/price/raw").and_then(as_amount).unwrap_or(0.0),
            currency: currency.to_string(),
        },
    }
}

fn skyscanner_leg(leg: &Value) -> Segment {
    let place = |side: &str| {
        leg.pointer(&format!("/{}/displayCode", side))
            .or_else(|| leg.pointer(&format!("/{}/id", side)))
            .and_then(as_string)
            .unwrap_or_default()
    };

    Segment {
        origin: place("origin"),
        destination: place("destination"),
        departure: leg.get("departure").and_then(Value::as_str).and_then(parse_timestamp),
        arrival: leg.get("arrival").and_then(Value::as_str).and_then(parse_timestamp),
        stops: leg.get("stopCount").and_then(as_count).unwrap_or(0),
        carrier: leg
            .pointer("/carriers/marketing/0/name")
            .and_then(as_string)
            .unwrap_or_else(|| UNKNOWN_CARRIER.to_string()),
        duration_minutes: leg.get("durationInMinutes").and_then(as_count),
    }
}

/// Kiwi-shaped payload: `data[].route[]`, hops flagged with `return: 0|1`
pub fn normalize_kiwi(payload: &Value, currency: &str) -> Vec<Itinerary> {
    let currency = payload
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or(currency);

    let Some(items) = payload.get("data").and_then(Value::as_array) else {
        debug!("Kiwi payload has no data array");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| kiwi_itinerary(item, currency))
        .collect()
}

fn kiwi_itinerary(item: &Value, currency: &str) -> Itinerary {
    let route: &[Value] = item
        .get("route")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let (outbound_hops, inbound_hops): (Vec<&Value>, Vec<&Value>) = route
        .iter()
        .partition(|hop| hop.get("return").and_then(Value::as_u64).unwrap_or(0) == 0);

    let mut outbound = if outbound_hops.is_empty() {
        kiwi_flat_segment(item)
    } else {
        kiwi_segment(&outbound_hops)
    };
    outbound.duration_minutes = item.pointer("/duration/departure").and_then(seconds_to_minutes);

    let inbound = if inbound_hops.is_empty() {
        None
    } else {
        let mut segment = kiwi_segment(&inbound_hops);
        segment.duration_minutes = item.pointer("/duration/return").and_then(seconds_to_minutes);
        Some(segment)
    };

    Itinerary {
        id: item.get("id").and_then(as_string),
        outbound,
        inbound,
        price: Price {
            amount: item.get("price").and_then(as_amount).unwrap_or(0.0),
            currency: currency.to_string(),
        },
    }
}

/// Segment spanning consecutive hops; callers pass a non-empty slice
fn kiwi_segment(hops: &[&Value]) -> Segment {
    let (Some(first), Some(last)) = (hops.first(), hops.last()) else {
        return Segment::default();
    };

    Segment {
        origin: first.get("flyFrom").and_then(as_string).unwrap_or_default(),
        destination: last.get("flyTo").and_then(as_string).unwrap_or_default(),
        departure: first.get("local_departure").and_then(Value::as_str).and_then(parse_timestamp),
        arrival: last.get("local_arrival").and_then(Value::as_str).and_then(parse_timestamp),
        stops: (hops.len() - 1) as u32,
        carrier: first
            .get("airline")
            .and_then(as_string)
            .unwrap_or_else(|| UNKNOWN_CARRIER.to_string()),
        duration_minutes: None,
    }
}

/// Segment from the top-level fields when no route is present
fn kiwi_flat_segment(item: &Value) -> Segment {
    Segment {
        origin: item.get("flyFrom").and_then(as_string).unwrap_or_default(),
        destination: item.get("flyTo").and_then(as_string).unwrap_or_default(),
        departure: item.get("local_departure").and_then(Value::as_str).and_then(parse_timestamp),
        arrival: item.get("local_arrival").and_then(Value::as_str).and_then(parse_timestamp),
        stops: 0,
        carrier: item
            .pointer("/airlines/0")
            .and_then(as_string)
            .unwrap_or_else(|| UNKNOWN_CARRIER.to_string()),
        duration_minutes: None,
    }
}

/// Drop itineraries with more stops than allowed in either direction
pub fn apply_max_stops(itineraries: Vec<Itinerary>, max_stops: Option<u32>) -> Vec<Itinerary> {
    match max_stops {
        Some(limit) => itineraries
            .into_iter()
            .filter(|itinerary| itinerary.max_stops() <= limit)
            .collect(),
        None => itineraries,
    }
}

/// Parse upstream timestamps such as `2025-06-01T08:30:00` or `2025-06-01T08:30:00.000Z`
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_count(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn seconds_to_minutes(value: &Value) -> Option<u32> {
    as_count(value).map(|secs| secs / 60)
}
