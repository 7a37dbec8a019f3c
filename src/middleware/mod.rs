//! Middleware module
//!
//! Request-scoped logging

pub mod logging;
