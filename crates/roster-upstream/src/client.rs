//! Upstream employee API client with connection pooling and rate limiting
//!
//! Wraps a pooled `reqwest::Client` with a per-request timeout and a
//! client-side request budget. Failures are classified into
//! `RosterError::Upstream` and returned as-is: there is no retry loop.

use crate::models::{CreateEmployeeRequest, DeleteEmployeeRequest, UpstreamEnvelope};
use crate::traits::EmployeeUpstream;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_common::{Employee, EmployeeDraft, Result, RosterError};
use serde::{de::DeserializeOwned, Serialize};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Configuration for the upstream API client
#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    /// Collection URL of the employee resource (e.g. "http://localhost:8112/api/v1/employee")
    pub base_url: String,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8112/api/v1/employee".to_string(),
            timeout_secs: 10,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
        }
    }
}

impl UpstreamClientConfig {
    /// Create a new configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }
}

/// reqwest implementation of [`EmployeeUpstream`]
#[derive(Debug, Clone)]
pub struct HttpEmployeeClient {
    client: Client,
    base_url: Url,
    config: UpstreamClientConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl HttpEmployeeClient {
    /// Create a new client with the given configuration
    pub fn new(config: UpstreamClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            RosterError::config_with_source(format!("Invalid upstream URL '{}'", config.base_url), e)
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| RosterError::upstream_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| RosterError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            base_url,
            config,
            rate_limiter,
        })
    }

    /// Send a request once, turning non-2xx answers into upstream errors
    async fn send(&self, request: RequestBuilder, operation: &str) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                error!("{}: upstream request timed out", operation);
            } else {
                error!("{}: upstream request failed: {}", operation, e);
            }
            RosterError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!("{}: upstream answered {}", operation, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("{}: upstream rate limit reached", operation);
        } else {
            error!("{}: upstream answered {}: {}", operation, status, body);
        }

        Err(RosterError::upstream_with_status(
            format!("{operation} failed with status {status}"),
            status.as_u16(),
        ))
    }

    /// Decode the `{ data: ... }` envelope of a successful response
    async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
        let envelope: UpstreamEnvelope<T> = response.json().await.map_err(|e| {
            error!("{}: undecodable upstream response: {}", operation, e);
            RosterError::from(e)
        })?;

        let description = envelope.describe().to_string();
        envelope.into_data().ok_or_else(|| {
            RosterError::upstream(format!("{operation} response contained no data ({description})"))
        })
    }

    /// Get metrics about the client configuration and state
    pub fn client_metrics(&self) -> ClientMetrics {
        ClientMetrics {
            base_url: self.config.base_url.clone(),
            timeout_secs: self.config.timeout_secs,
            max_idle_per_host: self.config.max_idle_per_host,
            rate_limit_per_sec: self.config.rate_limit_per_sec,
            has_rate_limit_capacity: self.rate_limiter.check().is_ok(),
        }
    }
}

#[async_trait]
impl EmployeeUpstream for HttpEmployeeClient {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Employee>> {
        info!("Fetching all employees from upstream");
        let request = self.client.get(self.base_url.clone());
        let response = self.send(request, "list employees").await?;
        let employees: Vec<Employee> = Self::decode(response, "list employees").await?;
        info!("Fetched {} employees from upstream", employees.len());
        Ok(employees)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: &EmployeeDraft) -> Result<Employee> {
        let request = self
            .client
            .post(self.base_url.clone())
            .json(&CreateEmployeeRequest::from(draft));
        let response = self.send(request, "create employee").await?;
        let employee: Employee = Self::decode(response, "create employee").await?;
        info!(id = %employee.id(), "Upstream created employee");
        Ok(employee)
    }

    #[instrument(skip(self, employee), fields(id = %employee.id()))]
    async fn delete(&self, employee: &Employee) -> Result<()> {
        let request = self
            .client
            .delete(self.base_url.clone())
            .json(&DeleteEmployeeRequest::from(employee));
        let response = self.send(request, "delete employee").await?;
        let deleted: bool = Self::decode(response, "delete employee").await?;

        if deleted {
            info!("Upstream deleted employee {}", employee.name());
            Ok(())
        } else {
            Err(RosterError::upstream(format!(
                "Upstream reported no employee named '{}' was deleted",
                employee.name()
            )))
        }
    }
}

/// Client metrics for monitoring and debugging
#[derive(Debug, Clone, Serialize)]
pub struct ClientMetrics {
    /// Base URL being used
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection pool max idle per host
    pub max_idle_per_host: usize,
    /// Rate limit requests per second
    pub rate_limit_per_sec: u32,
    /// Whether we currently have rate limit capacity
    pub has_rate_limit_capacity: bool,
}
