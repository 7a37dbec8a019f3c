//! Service layer module
//!
//! Contains the search adapter, upstream HTTP client, request budget and
//! itinerary normalizer

pub mod adapter;
pub mod budget;
pub mod client;
pub mod normalizer;

pub use adapter::{FlightSearchAdapter, SearchOutcome};
pub use budget::{BudgetSnapshot, RequestBudget};
pub use client::UpstreamClient;
