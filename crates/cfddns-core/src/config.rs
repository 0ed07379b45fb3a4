//! Configuration types for the DDNS client
//!
//! The configuration is a single JSON document describing one record in one
//! zone. Loading and validation happen once at startup; afterwards the value is
//! read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Check interval used when the file leaves it unset or zero
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 300;

/// Main DDNS configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// Cloudflare API token (bearer credential)
    pub api_token: String,

    /// Zone identifier the record lives in
    #[serde(alias = "zone_Id")]
    pub zone_id: String,

    /// Fully qualified record name (e.g., "home.example.com")
    pub record_name: String,

    /// Record type to keep in sync
    pub record_type: RecordType,

    /// Seconds between scheduled runs (0 = default)
    #[serde(default)]
    pub check_interval_seconds: u64,

    /// TTL override; absent means "keep what the provider has"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Proxy flag override; absent means "keep what the provider has"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for DdnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdnsConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("record_type", &self.record_type)
            .field("check_interval_seconds", &self.check_interval_seconds)
            .field("ttl", &self.ttl)
            .field("proxied", &self.proxied)
            .finish()
    }
}

impl DdnsConfig {
    /// Create a configuration with no overrides and the default interval
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            record_type,
            check_interval_seconds: DEFAULT_CHECK_INTERVAL_SECS,
            ttl: None,
            proxied: None,
        }
    }

    /// Set the TTL override
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the proxy flag override
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a configuration document
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| crate::Error::config(format!("malformed configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("api_token cannot be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(crate::Error::config("zone_id cannot be empty"));
        }
        if self.record_name.trim().is_empty() {
            return Err(crate::Error::config("record_name cannot be empty"));
        }
        Ok(())
    }

    /// Effective check interval in seconds
    pub fn check_interval_secs(&self) -> u64 {
        if self.check_interval_seconds == 0 {
            DEFAULT_CHECK_INTERVAL_SECS
        } else {
            self.check_interval_seconds
        }
    }

    /// Whether the interval fell back to the default
    pub fn uses_default_interval(&self) -> bool {
        self.check_interval_seconds == 0
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name used by DNS providers
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Address family carried by this record type
    pub fn ip_version(&self) -> IpVersion {
        match self {
            RecordType::A => IpVersion::V4,
            RecordType::Aaaa => IpVersion::V6,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_legacy_zone_id_spelling() {
        let config = DdnsConfig::from_json(
            r#"{
                "api_token": "secret",
                "zone_Id": "zone-1",
                "record_name": "home.example.com",
                "record_type": "AAAA",
                "check_interval_seconds": 60
            }"#,
        )
        .unwrap();

        assert_eq!(config.zone_id, "zone-1");
        assert_eq!(config.record_type, RecordType::Aaaa);
        assert_eq!(config.check_interval_secs(), 60);
        assert_eq!(config.ttl, None);
        assert_eq!(config.proxied, None);
    }

    #[test]
    fn explicit_zero_and_false_are_kept() {
        let config = DdnsConfig::from_json(
            r#"{
                "api_token": "secret",
                "zone_id": "zone-1",
                "record_name": "home.example.com",
                "record_type": "A",
                "ttl": 0,
                "proxied": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.ttl, Some(0));
        assert_eq!(config.proxied, Some(false));
    }

    #[test]
    fn zero_interval_falls_back_to_default() {
        let config = DdnsConfig::from_json(
            r#"{"api_token":"t","zone_id":"z","record_name":"n","record_type":"A"}"#,
        )
        .unwrap();

        assert!(config.uses_default_interval());
        assert_eq!(config.check_interval_secs(), DEFAULT_CHECK_INTERVAL_SECS);
    }

    #[test]
    fn unsupported_record_type_is_rejected() {
        let err = DdnsConfig::from_json(
            r#"{"api_token":"t","zone_id":"z","record_name":"n","record_type":"CNAME"}"#,
        )
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = DdnsConfig::from_json(
            r#"{"api_token":"  ","zone_id":"z","record_name":"n","record_type":"A"}"#,
        )
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_token":"t","zone_id":"z","record_name":"n","record_type":"A","ttl":120}}"#
        )
        .unwrap();

        let config = DdnsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ttl, Some(120));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DdnsConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn debug_hides_token() {
        let config = DdnsConfig::new("secret_token_12345", "z", "n", RecordType::A);
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(debug_str.contains("DdnsConfig"));
    }

    #[test]
    fn record_type_maps_to_family() {
        assert_eq!(RecordType::A.ip_version(), IpVersion::V4);
        assert_eq!(RecordType::Aaaa.ip_version(), IpVersion::V6);
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }
}
