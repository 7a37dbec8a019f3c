//! Flight Search Proxy Library
//!
//! Forwards flight searches to third-party travel APIs and normalizes the
//! results behind one provider-agnostic adapter

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

// Re-export common types
pub use config::{AppConfig, Settings};
pub use handlers::{create_router, AppState};
pub use models::{AirportIdentity, Itinerary, SearchRequest};
pub use services::{FlightSearchAdapter, RequestBudget, SearchOutcome, UpstreamClient};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
