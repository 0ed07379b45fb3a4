// # HTTP IP Resolver
//
// This crate provides the public-IP resolver for the DDNS client.
//
// ## Behavior
//
// Asks plain-text lookup services ("what is my IP") for the caller's address:
// - Three services per address family, tried in fixed priority order
// - The service that answered last is tried first on the next call
// - Any non-200 status, transport error or body that is not an IP literal of
//   the requested family counts as a failure for that service only
// - A short pause separates failed attempts
// - If every service fails, the call fails; no partial address is returned

use async_trait::async_trait;
use cfddns_core::traits::{IpResolver, ResolvedAddress};
use cfddns_core::{Error, IpVersion, RecordType, ResolverState, Result};
use std::time::Duration;

/// Default IPv4 lookup services, in priority order
pub const DEFAULT_IPV4_SERVICES: &[&str] = &[
    "https://ipv4.icanhazip.com",
    "https://ifconfig.co/ip?v=4",
    "https://api.ipify.org",
];

/// Default IPv6 lookup services, in priority order
pub const DEFAULT_IPV6_SERVICES: &[&str] = &[
    "https://ipv6.icanhazip.com",
    "https://ifconfig.co/ip?v=6",
    "https://api6.ipify.org",
];

/// Per-request timeout for lookup services
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between failed attempts
const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// HTTP lookup-service resolver with sticky endpoint and failover
pub struct HttpIpResolver {
    /// IPv4 candidates, in priority order
    ipv4_services: Vec<String>,

    /// IPv6 candidates, in priority order
    ipv6_services: Vec<String>,

    /// Pause between failed attempts
    retry_pause: Duration,

    /// Sticky endpoint
    state: ResolverState,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver over the default services
    pub fn new() -> Result<Self> {
        Self::with_services(
            DEFAULT_IPV4_SERVICES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_IPV6_SERVICES.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Create a resolver over custom service lists
    pub fn with_services(ipv4_services: Vec<String>, ipv6_services: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            ipv4_services,
            ipv6_services,
            retry_pause: DEFAULT_RETRY_PAUSE,
            state: ResolverState::new(),
            client,
        })
    }

    /// Set the pause between failed attempts
    pub fn with_retry_pause(mut self, retry_pause: Duration) -> Self {
        self.retry_pause = retry_pause;
        self
    }

    /// Use `state` as the sticky-endpoint cache
    pub fn with_state(mut self, state: ResolverState) -> Self {
        self.state = state;
        self
    }

    /// The sticky-endpoint cache
    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    fn services(&self, record_type: RecordType) -> &[String] {
        match record_type.ip_version() {
            IpVersion::V4 => &self.ipv4_services,
            IpVersion::V6 => &self.ipv6_services,
        }
    }

    /// Ask a single service; `None` on any kind of failure
    async fn query(&self, url: &str, record_type: RecordType) -> Option<ResolvedAddress> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Cannot reach {}: {}", url, e);
                return None;
            }
        };

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!("{} answered with HTTP {}", url, response.status());
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read response from {}: {}", url, e);
                return None;
            }
        };

        let address = ResolvedAddress::parse(&body, record_type);
        if address.is_none() {
            tracing::warn!(
                "{} returned {:?}, not an {} address",
                url,
                body.trim(),
                record_type
            );
        }
        address
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self, record_type: RecordType) -> Result<ResolvedAddress> {
        let sticky = self.state.sticky_endpoint().await;
        let mut attempted = 0;

        if let Some(url) = sticky.as_deref() {
            attempted += 1;
            if let Some(address) = self.query(url, record_type).await {
                tracing::info!("Got IP from last successful service {}", url);
                return Ok(address);
            }
        }

        for url in self.services(record_type) {
            if sticky.as_deref() == Some(url.as_str()) {
                continue;
            }

            if attempted > 0 && !self.retry_pause.is_zero() {
                tokio::time::sleep(self.retry_pause).await;
            }
            attempted += 1;

            if let Some(address) = self.query(url, record_type).await {
                tracing::info!("Got IP from service {}", url);
                self.state.set_sticky_endpoint(url.as_str()).await;
                return Ok(address);
            }
            tracing::debug!("Service {} failed, trying next", url);
        }

        Err(Error::NoServiceAvailable {
            record_type,
            attempted,
        })
    }
}
