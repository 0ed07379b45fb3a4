//! Core traits for the DDNS client
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpResolver`]: Determine the current public IP address
//! - [`DnsProvider`]: Read and update a DNS record via a provider API

pub mod ip_resolver;
pub mod dns_provider;

pub use ip_resolver::{IpResolver, ResolvedAddress};
pub use dns_provider::{DnsProvider, RemoteRecord, RecordUpdate, AUTO_TTL};
