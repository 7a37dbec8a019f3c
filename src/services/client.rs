//! HTTP client service
//!
//! The single place where upstream HTTP calls are made

use crate::config::ProviderConfig;
use crate::services::budget::RequestBudget;
use crate::utils::error::{helpers, AppError, AppResult};
use crate::utils::logging::{summarize_payload, truncate_content};
use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Upstream API client
///
/// Applies provider auth headers and records every attempted call in the
/// shared request budget.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    budget: Arc<RequestBudget>,
}

impl UpstreamClient {
    /// Create a new client instance
    pub fn new(timeout_secs: u64, budget: Arc<RequestBudget>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("flightproxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, budget })
    }

    /// Budget this client records into
    pub fn budget(&self) -> &Arc<RequestBudget> {
        &self.budget
    }

    /// GET a provider endpoint and parse the JSON body
    ///
    /// Non-success statuses become `AppError::Upstream` with the body kept as
    /// the payload. A missing API key fails before anything is sent or counted.
    pub async fn get_json(
        &self,
        provider: &ProviderConfig,
        path: &str,
        params: &[(String, String)],
    ) -> AppResult<serde_json::Value> {
        let api_key = provider.api_key()?;
        let url = provider.url(path);

        let call_number = self.budget.record();
        debug!("Upstream call #{}: GET {} {:?}", call_number, url, params);

        let mut request = self
            .client
            .get(&url)
            .query(params)
            .header(provider.auth.key_header.as_str(), api_key);

        if let (Some(name), Some(value)) = (&provider.auth.host_header, &provider.auth.host) {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            error!("Upstream request to {} failed: {}", url, e);
            AppError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Upstream {} returned {} - {}", url, status, truncate_content(&body, 300));
            return Err(helpers::upstream_error(status.as_u16(), &body));
        }

        let payload: serde_json::Value = serde_json::from_str(&body)?;
        debug!("Upstream {} responded: {}", url, summarize_payload(&payload));
        Ok(payload)
    }
}
