// # DNS Provider Trait
//
// Defines the interface for reading and updating one DNS record via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `cfddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::{DnsProvider, RecordType, RecordUpdate};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let existing = provider.fetch_record("home.example.com", RecordType::A).await?;
//     let update = RecordUpdate::merge(&config, &existing, "203.0.113.5");
//     provider.update_record(&existing.id, &update).await?;
//
//     Ok(())
// }
// ```

use crate::config::{DdnsConfig, RecordType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// TTL value meaning "automatic" at the provider
pub const AUTO_TTL: u32 = 1;

/// Provider-side snapshot of a DNS record
///
/// Held read-only for the duration of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// The record ID (provider-specific)
    pub id: String,
    /// The record name
    pub name: String,
    /// The record type as reported by the provider
    #[serde(rename = "type")]
    pub record_type: String,
    /// The record content (the IP address text)
    pub content: String,
    /// Time-to-live; 0 when the provider omits it
    #[serde(default)]
    pub ttl: u32,
    /// Proxy flag, if the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

/// Payload written to the provider when the record needs a new address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    /// Record type (from configuration)
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Record name (from configuration)
    pub name: String,
    /// New IP address
    pub content: String,
    /// Resolved TTL
    pub ttl: u32,
    /// Resolved proxy flag; omitted when nobody expressed an opinion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

impl RecordUpdate {
    /// Build the payload for moving `existing` to `content`
    ///
    /// TTL: configured override, else the existing non-zero TTL, else
    /// [`AUTO_TTL`]. Proxy flag: configured override, else the existing flag,
    /// else omitted.
    pub fn merge(config: &DdnsConfig, existing: &RemoteRecord, content: impl Into<String>) -> Self {
        let ttl = match config.ttl {
            Some(ttl) => ttl,
            None if existing.ttl != 0 => existing.ttl,
            None => AUTO_TTL,
        };

        Self {
            record_type: config.record_type,
            name: config.record_name.clone(),
            content: content.into(),
            ttl,
            proxied: config.proxied.or(existing.proxied),
        }
    }
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// Providers are single-shot: one API call per method invocation, no retries,
/// no caching. Deciding whether an update is needed belongs to the reconciler.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the record for `record_name` / `record_type`
    ///
    /// # Returns
    ///
    /// - `Ok(RemoteRecord)`: The first matching record
    /// - `Err(Error::Http)`: Transport failure
    /// - `Err(Error::Provider)`: The provider reported an unsuccessful response
    /// - `Err(Error::NotFound)`: The result set was empty
    async fn fetch_record(
        &self,
        record_name: &str,
        record_type: RecordType,
    ) -> Result<RemoteRecord, crate::Error>;

    /// Write `update` to the record identified by `record_id`
    ///
    /// Success means the provider explicitly reported success, not merely a
    /// transport-level OK.
    async fn update_record(
        &self,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
