//! Shared HTTP plumbing for the provider clients: request spacing and retries.
//!
//! Policy:
//! - requests through one `Fetcher` are spaced at least `min_interval` apart;
//! - 401/403 and other non-429 status errors fail immediately;
//! - 429 waits `(attempt + 1) * rate_limit_backoff` and retries;
//! - transport errors wait `retry_delay` and retry;
//! - at most `max_retries` retries per request.
//!
//! Some providers carry credentials in the URL path, so errors never embed the
//! request URL and logged URLs have registered secrets masked.

use crate::error::{AppError, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, warn};

/// Timing knobs for [`Fetcher`].
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub min_interval: Duration,
    pub rate_limit_backoff: Duration,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_interval: Duration::from_millis(1500),
            rate_limit_backoff: Duration::from_secs(2),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Same retry counts, no waiting. For tests against a local mock server.
    pub fn immediate() -> Self {
        Self {
            min_interval: Duration::ZERO,
            rate_limit_backoff: Duration::ZERO,
            retry_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// A rate-limited, retrying GET client for one provider.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    last_request: Mutex<Option<Instant>>,
    secrets: Vec<String>,
}

const REDACTED: &str = "[redacted]";

impl Fetcher {
    /// Builds a fetcher whose requests carry `user_agent` (NWS and Nominatim
    /// refuse anonymous clients).
    pub fn new(user_agent: &str, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            policy,
            last_request: Mutex::new(None),
            secrets: Vec::new(),
        })
    }

    /// Masks `secret` wherever a request URL is logged or reported.
    pub fn redacting(mut self, secret: &str) -> Self {
        if !secret.is_empty() {
            self.secrets.push(secret.to_string());
        }
        self
    }

    fn display_url(&self, url: &str) -> String {
        self.secrets
            .iter()
            .fold(url.to_string(), |shown, secret| shown.replace(secret.as_str(), REDACTED))
    }

    /// GETs `url` and deserializes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.send(url, query).await?;
        response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Error parsing response JSON from {}: {}", self.display_url(url), e);
            AppError::Api(e.into())
        })
    }

    /// GETs `url` and returns the body as text.
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self.send(url, query).await?;
        response
            .text()
            .await
            .map_err(|e| AppError::Api(e.without_url().into()))
    }

    async fn send(&self, url: &str, query: &[(&str, String)]) -> Result<Response> {
        let shown = self.display_url(url);
        let mut attempt = 0;
        loop {
            self.throttle().await;
            debug!("GET {} (attempt {})", shown, attempt + 1);

            let result = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .and_then(|response| response.error_for_status());

            let err = match result {
                Ok(response) => return Ok(response),
                Err(e) => e.without_url(),
            };

            match err.status() {
                Some(StatusCode::TOO_MANY_REQUESTS) => {
                    if attempt >= self.policy.max_retries {
                        error!("Rate limit exceeded for {} after {} attempts", shown, attempt + 1);
                        return Err(AppError::RateLimited(shown));
                    }
                    let wait = self.policy.rate_limit_backoff * (attempt + 1);
                    warn!("Rate limited by {}, waiting {:?}", shown, wait);
                    sleep(wait).await;
                },
                Some(status) => {
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        error!("Received {} from {}. Check the configured API key.", status, shown);
                    } else {
                        error!("Request to {} failed with status {}: {}", shown, status, err);
                    }
                    return Err(AppError::Api(err.into()));
                },
                None => {
                    if attempt >= self.policy.max_retries {
                        error!("Request to {} failed after {} attempts: {}", shown, attempt + 1, err);
                        return Err(AppError::Api(err.into()));
                    }
                    warn!("Request to {} failed, retrying ({})", shown, err);
                    sleep(self.policy.retry_delay).await;
                },
            }
            attempt += 1;
        }
    }

    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.policy.min_interval {
                let wait = self.policy.min_interval - elapsed;
                debug!("Rate limiting: sleeping for {:?}", wait);
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Pong {
        ok: bool,
    }

    fn fetcher() -> Fetcher {
        Fetcher::new("hazard-watch-tests", RetryPolicy::immediate()).unwrap()
    }

    #[tokio::test]
    async fn test_get_json_success() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("user-agent", "hazard-watch-tests")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let pong: Pong = fetcher().get_json(&format!("{}/ping", server.url()), &[]).await?;

        assert_eq!(pong, Pong { ok: true });
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limited_retries_then_gives_up() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/busy")
            .with_status(429)
            .expect(3) // first attempt + two retries
            .create_async()
            .await;

        let result: Result<Pong> = fetcher().get_json(&format!("{}/busy", server.url()), &[]).await;

        assert!(matches!(result, Err(AppError::RateLimited(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_fails_without_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/secret")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let result: Result<Pong> = fetcher().get_json(&format!("{}/secret", server.url()), &[]).await;

        assert!(matches!(result, Err(AppError::Api(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_errors_do_not_leak_secret_in_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/keys/SECRET-KEY/data")
            .with_status(500)
            .create_async()
            .await;
        let fetcher = fetcher().redacting("SECRET-KEY");
        let url = format!("{}/keys/SECRET-KEY/data", server.url());

        let err = fetcher.get_text(&url, &[]).await.unwrap_err();

        assert!(matches!(err, AppError::Api(_)));
        assert!(!err.to_string().contains("SECRET-KEY"), "leaked: {}", err);
        assert_eq!(
            fetcher.display_url(&url),
            format!("{}/keys/[redacted]/data", server.url())
        );
    }

    #[tokio::test]
    async fn test_rate_limit_error_names_redacted_url() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/keys/SECRET-KEY/busy")
            .with_status(429)
            .create_async()
            .await;
        let fetcher = fetcher().redacting("SECRET-KEY");

        let err = fetcher
            .get_text(&format!("{}/keys/SECRET-KEY/busy", server.url()), &[])
            .await
            .unwrap_err();

        match err {
            AppError::RateLimited(shown) => {
                assert!(shown.ends_with("/keys/[redacted]/busy"));
            },
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_min_interval_spaces_requests() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/text")
            .with_status(200)
            .with_body("hello")
            .expect(2)
            .create_async()
            .await;
        let policy = RetryPolicy {
            min_interval: Duration::from_millis(200),
            ..RetryPolicy::immediate()
        };
        let fetcher = Fetcher::new("hazard-watch-tests", policy).unwrap();
        let url = format!("{}/text", server.url());

        let started = Instant::now();
        assert_eq!(fetcher.get_text(&url, &[]).await.unwrap(), "hello");
        assert_eq!(fetcher.get_text(&url, &[]).await.unwrap(), "hello");

        assert!(started.elapsed() >= Duration::from_millis(200));
    }
}
