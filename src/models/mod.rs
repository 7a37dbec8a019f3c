//! Data models module
//!
//! Defines search requests, normalized itineraries and inbound HTTP parameters

pub mod api;
pub mod itinerary;
pub mod search;

pub use itinerary::{Itinerary, Price, Segment};
pub use search::{AirportIdentity, CabinClass, SearchRequest, SortKey};
