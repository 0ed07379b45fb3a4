// # IP Resolver Trait
//
// Defines the interface for obtaining the current public IP address of a
// requested family.
//
// ## Implementations
//
// - HTTP lookup services with failover: `cfddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfddns_core::{IpResolver, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let address = resolver.resolve(RecordType::A).await?;
//     println!("public address: {}", address);
//
//     Ok(())
// }
// ```

use crate::config::{IpVersion, RecordType};
use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;

/// A public IP address as reported by a lookup service
///
/// The textual form is kept as received (trimmed) because it is compared
/// verbatim against the provider's record content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedAddress {
    text: String,
    version: IpVersion,
}

impl ResolvedAddress {
    /// Validate `text` as an IP literal of the family `record_type` carries
    ///
    /// Returns `None` for anything that is not an IP literal, and for a valid
    /// literal of the other family. IPv4-mapped IPv6 literals such as
    /// `::ffff:192.0.2.1` count as IPv4.
    pub fn parse(text: &str, record_type: RecordType) -> Option<Self> {
        let text = text.trim();
        let ip: IpAddr = text.parse().ok()?;

        let version = match ip {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        };

        if version != record_type.ip_version() {
            return None;
        }

        Some(Self {
            text: text.to_string(),
            version,
        })
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The address family
    pub fn version(&self) -> IpVersion {
        self.version
    }

    /// Consume into the address text
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Trait for IP resolver implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// A resolver may keep process-lifetime hints (such as which service answered
/// last) but never returns an address of the wrong family as a success.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the current public address for `record_type`
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedAddress)`: An address of the family `record_type` carries
    /// - `Err(Error::NoServiceAvailable)`: If every candidate failed
    async fn resolve(&self, record_type: RecordType) -> Result<ResolvedAddress, crate::Error>;
}
