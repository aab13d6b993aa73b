//! GET-and-decode client with a per-URL response cache.

use crate::error::FetchError;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Status code and decoded JSON body of a successful request.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Value,
}

struct CachedResponse {
    stored_at: Instant,
    response: FetchResponse,
}

/// HTTP client for third-party JSON endpoints.
pub struct HttpFetcher {
    client: Client,
    cache: RwLock<HashMap<String, CachedResponse>>,
    cache_ttl: Duration,
}

impl HttpFetcher {
    /// Create a fetcher. A zero `cache_ttl` disables caching.
    pub fn new(timeout: Duration, cache_ttl: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hybrid-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, cache_ttl))
    }

    pub fn with_client(client: Client, cache_ttl: Duration) -> Self {
        Self {
            client,
            cache: RwLock::new(HashMap::new()),
            cache_ttl,
        }
    }

    /// GET `url` and decode its body as JSON.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        if let Some(hit) = self.cached(url).await {
            debug!("Serving cached response");
            return Ok(hit);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(status = status.as_u16(), "Endpoint returned an error status");
            debug!(body = %body.chars().take(512).collect::<String>(), "Error response body");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        let fetched = FetchResponse {
            status: status.as_u16(),
            body,
        };
        self.store(url, &fetched).await;
        Ok(fetched)
    }

    async fn cached(&self, url: &str) -> Option<FetchResponse> {
        if self.cache_ttl.is_zero() {
            return None;
        }
        let cache = self.cache.read().await;
        cache
            .get(url)
            .filter(|c| c.stored_at.elapsed() < self.cache_ttl)
            .map(|c| c.response.clone())
    }

    async fn store(&self, url: &str, response: &FetchResponse) {
        if self.cache_ttl.is_zero() {
            return;
        }
        let mut cache = self.cache.write().await;
        let ttl = self.cache_ttl;
        cache.retain(|_, c| c.stored_at.elapsed() < ttl);
        cache.insert(
            url.to_string(),
            CachedResponse {
                stored_at: Instant::now(),
                response: response.clone(),
            },
        );
    }
}
