// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare record fetcher and updater for the DDNS
// client.
//
// ## Behavior
//
// - One HTTP request per call; no retries, no caching, no background tasks
// - Success is the envelope's `success` flag, not the HTTP status
// - Reads time out after 5 seconds, writes after 10
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfddns_core::traits::{DnsProvider, RecordUpdate, RemoteRecord};
use cfddns_core::{DdnsConfig, Error, RecordType, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Timeout for record reads
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for record writes
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every API request
const USER_AGENT: &str = "cf-ddns/1.0";

/// Cloudflare v4 response envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

/// An entry of the envelope's `errors` array
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

fn describe(errors: &[ApiMessage]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map an HTTP status whose body was not an envelope to a diagnostic
fn status_error(status: reqwest::StatusCode, body: &str, action: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::provider(
            "cloudflare",
            format!(
                "Authentication failed: Invalid API token or insufficient permissions. Status: {}",
                status
            ),
        ),
        // A missing record comes back as an empty result set, not a 404
        404 => Error::provider(
            "cloudflare",
            format!("{}: endpoint not found. Status: {}", action, status),
        ),
        429 => Error::provider(
            "cloudflare",
            format!("Rate limit exceeded. Please retry later. Status: {}", status),
        ),
        500..=599 => Error::provider(
            "cloudflare",
            format!("Cloudflare server error (transient): {} - {}", status, body),
        ),
        _ => Error::provider(
            "cloudflare",
            format!("{} failed: {} - {}", action, status, body),
        ),
    }
}

/// Cloudflare DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone the record lives in
    zone_id: String,

    /// API base URL
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone the record lives in
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_token, zone_id, CLOUDFLARE_API_BASE)
    }

    /// Create a provider from the client configuration
    pub fn from_config(config: &DdnsConfig) -> Result<Self> {
        Self::new(config.api_token.clone(), config.zone_id.clone())
    }

    /// Create a provider talking to `base_url` instead of the public API
    pub fn with_base_url(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token is required"));
        }

        let zone_id = zone_id.into();
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone ID is required"));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.base_url, self.zone_id)
    }

    /// Start an authenticated API request
    ///
    /// Headers are set here, before any body, so `.json()` does not add a
    /// second `Content-Type`.
    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    /// Send `request` and decode the response envelope
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        action: &str,
    ) -> Result<Envelope<T>> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: request failed: {}", action, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("{}: failed to read response: {}", action, e)))?;

        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(status_error(status, &body, action)),
            Err(e) => Err(Error::provider(
                "cloudflare",
                format!("{}: failed to parse response: {}", action, e),
            )),
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=home.example.com
    /// Authorization: Bearer <token>
    /// ```
    async fn fetch_record(&self, record_name: &str, record_type: RecordType) -> Result<RemoteRecord> {
        tracing::debug!("Looking up record {} (type: {})", record_name, record_type);

        let request = self
            .request(reqwest::Method::GET, self.records_url())
            .query(&[("type", record_type.as_str()), ("name", record_name)])
            .timeout(READ_TIMEOUT);

        let envelope: Envelope<Vec<RemoteRecord>> = self.send(request, "Record lookup").await?;

        if !envelope.success {
            return Err(Error::provider(
                "cloudflare",
                format!("Record lookup rejected: {}", describe(&envelope.errors)),
            ));
        }

        envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| {
                Error::not_found(format!(
                    "DNS record not found: {} (type: {})",
                    record_name, record_type
                ))
            })
    }

    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {"type": "A", "name": "...", "content": "1.2.3.4", "ttl": 1, "proxied": false}
    /// ```
    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<()> {
        tracing::info!(
            "Updating Cloudflare DNS record: {} -> {} ({})",
            update.name,
            update.content,
            update.record_type
        );

        let request = self
            .request(
                reqwest::Method::PUT,
                format!("{}/{}", self.records_url(), record_id),
            )
            .json(update)
            .timeout(WRITE_TIMEOUT);

        let envelope: Envelope<serde_json::Value> = self.send(request, "Record update").await?;

        if !envelope.success {
            return Err(Error::provider(
                "cloudflare",
                format!("Record update rejected: {}", describe(&envelope.errors)),
            ));
        }

        tracing::info!("DNS record updated successfully: {} -> {}", update.name, update.content);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
