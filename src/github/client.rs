// GitHub GraphQL HTTP client.
// Handles authentication, rate limiting, and request/response validation.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StatsError};

use super::types::RateLimit;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// A single GraphQL request. `operation` names the call for accounting.
#[derive(Debug, Clone)]
pub struct GraphQlRequest<'a> {
    pub operation: &'static str,
    pub query: &'a str,
    pub variables: Value,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(operation: &'static str, query: &'a str, variables: Value) -> Self {
        Self {
            operation,
            query,
            variables,
        }
    }
}

/// Anything that can execute a GraphQL request and hand back its `data` object.
#[allow(async_fn_in_trait)]
pub trait GraphQlTransport {
    async fn post(&mut self, request: GraphQlRequest<'_>) -> Result<Value>;
}

/// Number of requests issued per operation.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    counts: BTreeMap<&'static str, u64>,
}

impl QueryStats {
    pub fn record(&mut self, operation: &'static str) {
        *self.counts.entry(operation).or_default() += 1;
    }

    pub fn get(&self, operation: &str) -> u64 {
        self.counts.get(operation).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.counts.iter().map(|(op, n)| (*op, *n))
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: &'a Value,
}

/// GitHub GraphQL client with authentication and rate limit tracking.
pub struct GitHubClient {
    client: Client,
    endpoint: String,
    rate_limit: RateLimit,
    stats: QueryStats,
}

impl GitHubClient {
    /// Create a new GitHub client with the given token and request timeout.
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| StatsError::Config(format!("invalid token: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("readme-stats"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
            rate_limit: RateLimit::default(),
            stats: QueryStats::default(),
        })
    }

    /// Point the client at a different GraphQL endpoint (GitHub Enterprise).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Get the current rate limit information.
    pub fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Requests issued so far, per operation.
    pub fn stats(&self) -> &QueryStats {
        &self.stats
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&mut self, response: &Response) {
        let header = |name: &str| -> Option<u64> {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };

        if let Some(limit) = header("x-ratelimit-limit") {
            self.rate_limit.limit = Some(limit);
        }
        if let Some(remaining) = header("x-ratelimit-remaining") {
            self.rate_limit.remaining = Some(remaining);
        }
        if let Some(reset) = header("x-ratelimit-reset") {
            self.rate_limit.reset = Some(reset);
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(StatsError::Unauthorized),
            StatusCode::FORBIDDEN if self.rate_limit.is_exhausted() => {
                Err(StatsError::RateLimited {
                    reset_at: self.rate_limit.reset_at(),
                })
            }
            status => Err(StatsError::Http {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

impl GraphQlTransport for GitHubClient {
    async fn post(&mut self, request: GraphQlRequest<'_>) -> Result<Value> {
        self.stats.record(request.operation);

        let body = RequestBody {
            query: request.query,
            variables: &request.variables,
        };
        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        self.update_rate_limit(&response);
        let response = self.check_response(response).await?;

        let payload: Value = response.json().await.map_err(|e| {
            StatsError::protocol(format!("{}: non-JSON response: {}", request.operation, e))
        })?;
        extract_data(request.operation, payload)
    }
}

/// Pull `data` out of a GraphQL envelope, rejecting error-bearing payloads.
pub fn extract_data(operation: &str, mut payload: Value) -> Result<Value> {
    if let Some(errors) = payload.get("errors").filter(|e| !e.is_null()) {
        let rate_limited = errors
            .as_array()
            .is_some_and(|list| list.iter().any(|e| e["type"] == "RATE_LIMITED"));
        if rate_limited {
            return Err(StatsError::RateLimited {
                reset_at: "unknown".to_string(),
            });
        }
        return Err(StatsError::protocol(format!(
            "{}: GraphQL errors: {}",
            operation, errors
        )));
    }

    match payload.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Err(StatsError::protocol(format!(
            "{}: missing data field",
            operation
        ))),
        Some(data) => Ok(data),
    }
}
