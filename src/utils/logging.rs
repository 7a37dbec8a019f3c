//! Logging utilities
//!
//! Shared logging helpers that keep debug output readable

use crate::models::search::SearchRequest;

/// Set to true to dump complete upstream payloads in debug logs
/// Default is false to reduce log verbosity
pub const VERBOSE_UPSTREAM_LOGGING: bool = false;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... ({} chars truncated)", &s[..cut], s.len() - cut)
    } else {
        s.to_string()
    }
}

/// Create a compact summary of a search request for logging
pub fn create_search_log_summary(request: &SearchRequest) -> serde_json::Value {
    serde_json::json!({
        "origin": request.origin,
        "destination": request.destination,
        "departure_date": request.departure_date.map(|d| d.to_string()),
        "return_date": request.return_date.map(|d| d.to_string()),
        "adults": request.adults,
        "cabin_class": request.cabin_class.as_str(),
        "currency": request.currency,
        "max_stops": request.max_stops,
    })
}

/// Summarize an upstream payload for logging
pub fn summarize_payload(payload: &serde_json::Value) -> String {
    let text = payload.to_string();
    if VERBOSE_UPSTREAM_LOGGING {
        text
    } else {
        truncate_content(&text, 300)
    }
}
