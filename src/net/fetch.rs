//! Read endpoints with exponential backoff.
//!
//! ERROR HANDLING
//! ==============
//! Exhausted retries are not an error at this layer: the fetcher logs once
//! and returns an empty collection, so views render "nothing" rather than
//! failing. Callers cannot tell an empty table from a dead backend.
//!
//! Only GET endpoints go through here; repeating them is harmless.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::client::ApiGet;
use super::types::{ApiError, Service, ServiceRequest};

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;

pub const SERVICES_PATH: &str = "/services";
pub const SERVICE_REQUESTS_PATH: &str = "/service-requests";

const DEFAULT_MAX_RETRIES: u32 = 5;
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Bounded exponential backoff: retry `n` (1-based) waits `base_delay * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, base_delay: DEFAULT_BASE_DELAY }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (already incremented, so 1..=max).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2_u32.saturating_pow(retry))
    }
}

/// GET `path` until it decodes as a list, backing off between failures.
/// Returns an empty list once `policy.max_retries` retries have failed.
pub async fn fetch_with_backoff<T>(api: &dyn ApiGet, path: &str, policy: RetryPolicy) -> Vec<T>
where
    T: DeserializeOwned,
{
    let mut retry_count: u32 = 0;
    loop {
        let result = api.get_value(path).await.and_then(|value| {
            serde_json::from_value::<Vec<T>>(value)
                .map_err(|e| ApiError::Decode { path: path.to_owned(), message: e.to_string() })
        });

        let error = match result {
            Ok(items) => return items,
            Err(error) => error,
        };

        if retry_count >= policy.max_retries {
            tracing::error!(path, attempts = retry_count + 1, error = %error, "fetch failed; giving up");
            return Vec::new();
        }

        retry_count += 1;
        let delay = policy.delay_for(retry_count);
        tracing::warn!(path, retry = retry_count, delay = ?delay, error = %error, "fetch failed; backing off");
        tokio::time::sleep(delay).await;
    }
}

/// All services offered on the marketplace.
pub async fn fetch_services(api: &dyn ApiGet) -> Vec<Service> {
    fetch_with_backoff(api, SERVICES_PATH, RetryPolicy::default()).await
}

/// Service requests visible to the current session.
pub async fn fetch_service_requests(api: &dyn ApiGet) -> Vec<ServiceRequest> {
    fetch_with_backoff(api, SERVICE_REQUESTS_PATH, RetryPolicy::default()).await
}
