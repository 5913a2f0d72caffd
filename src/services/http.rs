use std::time::Duration;

use reqwest::{header::HeaderMap, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::{EstimatorError, Result};

const INITIAL_BACKOFF: Duration = Duration::from_millis(250);
/// Longest `Retry-After` worth waiting for before giving up on the provider.
const MAX_RETRY_WAIT: Duration = Duration::from_secs(5);

/// JSON-over-HTTP transport shared by every completion provider.
#[derive(Clone, Debug)]
pub struct JsonHttpClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: usize,
}

impl JsonHttpClient {
    pub fn new(base_url: &str, timeout: Duration, max_retries: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| EstimatorError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `path` below the base URL and return the decoded JSON.
    ///
    /// 429 and 5xx responses are retried with exponential backoff, honouring
    /// `Retry-After` on 429. A `Retry-After` longer than the request timeout
    /// (capped at five seconds) fails immediately with `RateLimit`.
    pub async fn post_json(&self, path: &str, headers: HeaderMap, body: &Value) -> Result<Value> {
        let url = build_url(&self.base_url, path);
        let mut attempt = 0;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(body)
                .send()
                .await?;

            let status = response.status();
            let retry_after = retry_after(response.headers());
            let response_text = response.text().await?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let ceiling = self.timeout.min(MAX_RETRY_WAIT);
                let wait = retry_after.unwrap_or(backoff);
                if attempt < self.max_retries && wait <= ceiling {
                    debug!(target: "tirtha::http", %url, attempt, wait_ms = wait.as_millis() as u64, "rate limited, retrying");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }

                return Err(EstimatorError::RateLimit {
                    retry_after: wait.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < self.max_retries {
                debug!(target: "tirtha::http", %url, attempt, %status, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(EstimatorError::Api {
                    status: status.as_u16(),
                    message: api_error_message(&response_text),
                });
            }

            let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
                EstimatorError::Provider(format!("Failed to parse response JSON: {err}"))
            })?;

            return Ok(response_json);
        }
    }
}

fn build_url(base_url: &str, path: &str) -> String {
    if base_url.ends_with(path) {
        base_url.to_string()
    } else {
        format!("{}{}", base_url, path)
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Pull a readable message out of a provider error body.
fn api_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message").or(Some(error)))
                .or_else(|| json.get("message"))
        })
        .map(|value| match value.as_str() {
            Some(text) => text.to_string(),
            None => value.to_string(),
        })
        .unwrap_or_else(|| body.trim().to_string())
}
