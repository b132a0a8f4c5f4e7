use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::traits::PageFetcher;

/// Fixed per-request timeout; no retries happen at this layer.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Classified result of fetching one catalog page.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// HTTP 200 with the response body.
    Success(String),
    /// HTTP 404 - the catalog pagination is exhausted.
    NotFound,
    /// Any other HTTP error or a network-level request failure.
    TransientError(String),
    /// A failure outside the request/HTTP path, e.g. body decoding.
    UnexpectedError(String),
}

/// HTTP implementation of [`PageFetcher`]: one GET per call with a fixed
/// timeout, all failures converted into [`FetchOutcome`] variants.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .timeout(FETCH_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::TransientError(e.to_string()),
        };

        match response.status() {
            StatusCode::NOT_FOUND => FetchOutcome::NotFound,
            status if !status.is_success() => {
                FetchOutcome::TransientError(format!("HTTP {status}"))
            }
            _ => match response.text().await {
                Ok(body) => FetchOutcome::Success(body),
                Err(e) => FetchOutcome::UnexpectedError(e.to_string()),
            },
        }
    }
}

impl Clone for HttpFetcher {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}
