/*!
 * Shared HTTP plumbing for the remote translator clients.
 *
 * Both clients post a JSON body and retry transport failures and
 * outage-class API errors with exponential backoff. Client errors (4xx other
 * than 429) are returned immediately.
 */

use log::{debug, warn};
use rand::Rng;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::errors::ProviderError;

/// Retry settings for one client
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Base backoff in milliseconds, doubled on each retry
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Delay before retry number `attempt` (1-based), with up to 10% jitter
    pub fn backoff(&self, attempt: u32) -> Duration {
        let base = self.backoff_base_ms.saturating_mul(1u64 << (attempt.saturating_sub(1)).min(16));
        let jitter = if base > 0 {
            rand::rng().random_range(0..=base / 10)
        } else {
            0
        };
        Duration::from_millis(base + jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

/// Build the pooled HTTP client used by the translator clients
pub fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_default()
}

/// Map a non-success HTTP status to a provider error
pub fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(body)
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

/// Send a request built by `build` and decode the JSON body, retrying per `policy`
pub async fn send_json<T, B>(
    provider: &str,
    policy: RetryPolicy,
    build: B,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
    B: Fn() -> RequestBuilder,
{
    let mut attempt = 0;

    loop {
        let result = match build().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    response
                        .json::<T>()
                        .await
                        .map_err(|e| ProviderError::ParseError(e.to_string()))
                } else {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());
                    Err(status_error(status, body))
                }
            }
            Err(e) if e.is_connect() => Err(ProviderError::ConnectionError(e.to_string())),
            Err(e) => Err(ProviderError::RequestFailed(e.to_string())),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(error) if error.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                warn!(
                    "{} request failed: {} - retry {}/{} in {:?}",
                    provider, error, attempt, policy.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                debug!("{} request failed after {} attempts: {}", provider, attempt + 1, error);
                return Err(error);
            }
        }
    }
}
