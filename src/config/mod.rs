//! Configuration management module
//!
//! Environment settings and the upstream provider table

pub mod file;
pub mod settings;

pub use file::{
    AppConfig, AuthConfig, DateFormat, EndpointConfig, ParamNames, PriceTableParams,
    ProviderConfig, ProviderKind,
};
pub use settings::Settings;
