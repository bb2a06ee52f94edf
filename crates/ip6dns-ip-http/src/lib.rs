// # HTTP IP Source
//
// This crate provides an HTTP-based IPv6 source for the updater.
//
// ## Architecture
//
// Fetches the current address from an echo service (e.g. ip6.seeip.org,
// v6.ident.me) that answers a plain GET with the caller's address as the
// response body. One request per lookup, no polling and no retries: the
// fallback to a second service is owned by `IpResolver`.

use ip6dns_core::config::IpSourcesConfig;
use ip6dns_core::traits::IpSource;
use ip6dns_core::{Error, IpResolver, Result};

use std::time::Duration;

/// Default HTTP timeout for lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://ip6.seeip.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// The URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "{} answered with HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::transport(format!("Failed to read response from {}: {}", self.url, e))
        })?;

        // Raw body is the address; only surrounding whitespace is dropped
        Ok(body.trim().to_string())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Build the primary/secondary resolver from configuration
pub fn resolver_from_config(config: &IpSourcesConfig) -> IpResolver {
    IpResolver::new(
        Box::new(HttpIpSource::new(config.primary_url.clone())),
        Box::new(HttpIpSource::new(config.secondary_url.clone())),
    )
}
