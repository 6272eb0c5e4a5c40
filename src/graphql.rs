use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ApiConfig, Config, RateLimitConfig};
use crate::error::{GraphQlError, MondayError};
use crate::metrics::Metrics;
use crate::ratelimit::{RateLimiter, SharedRateLimiter};

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
    // Legacy error envelope still returned for some account-level failures.
    #[serde(default)]
    error_message: Option<String>,
}

pub struct MondayClient {
    client: Client,
    api_url: String,
    token: String,
    api_version: Option<String>,
    limiter: SharedRateLimiter,
    metrics: Arc<Metrics>,
}

impl MondayClient {
    pub fn new(api: &ApiConfig, limits: RateLimitConfig) -> Result<Self, MondayError> {
        Self::with_token(api, api.resolve_token(), limits)
    }

    fn with_token(
        api: &ApiConfig,
        token: Option<String>,
        limits: RateLimitConfig,
    ) -> Result<Self, MondayError> {
        let token = token.ok_or_else(|| MondayError::Config("missing API token".into()))?;
        let limiter = SharedRateLimiter::new(RateLimiter::new(limits)?);
        Self::with_limiter(api, token, limiter)
    }

    pub fn from_config(config: &Config) -> Result<Self, MondayError> {
        Self::new(&config.api, config.limits.clone())
    }

    pub fn with_limiter(
        api: &ApiConfig,
        token: String,
        limiter: SharedRateLimiter,
    ) -> Result<Self, MondayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(api.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_url: api.url.clone(),
            token,
            api_version: api.api_version.clone(),
            limiter,
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn rate_limiter(&self) -> &SharedRateLimiter {
        &self.limiter
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Run one GraphQL document. The rate limiter is consulted exactly once,
    /// before anything is sent.
    pub async fn execute<V, R>(&self, query: &str, variables: V) -> Result<R, MondayError>
    where
        V: Serialize,
        R: DeserializeOwned,
    {
        if let Err(e) = self.limiter.acquire().await {
            self.metrics.inc_rate_limits();
            return Err(e);
        }

        self.metrics.inc_requests();
        debug!(url = %self.api_url, "Sending GraphQL request");

        let mut request = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, &self.token)
            .json(&GraphQlRequest { query, variables });
        if let Some(version) = &self.api_version {
            request = request.header("API-Version", version);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                self.metrics.inc_http_errors();
                warn!("GraphQL transport failed: {}", e);
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.metrics.inc_http_errors();
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "API returned error status");
            return Err(MondayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .json::<GraphQlResponse<R>>()
            .await
            .map_err(|e| MondayError::InvalidResponse(e.to_string()))?;

        let mut errors = body.errors.unwrap_or_default();
        if let Some(message) = body.error_message {
            errors.push(GraphQlError {
                message,
                extensions: None,
            });
        }
        if !errors.is_empty() {
            self.metrics.inc_graphql_errors();
            warn!(count = errors.len(), "GraphQL response carried errors");
            return Err(MondayError::GraphQl(errors));
        }

        let data = body
            .data
            .ok_or_else(|| MondayError::InvalidResponse("Missing data".into()))?;
        self.metrics.inc_succeeded();
        Ok(data)
    }

    pub async fn query<R: DeserializeOwned>(&self, query: &str) -> Result<R, MondayError> {
        self.execute(query, serde_json::Map::new()).await
    }
}
