// # cfddns-core
//
// Core library for the Cloudflare DDNS client.
//
// ## Architecture Overview
//
// This library keeps one DNS record pointed at the caller's public IP:
// - **IpResolver**: Trait for obtaining the current public IP of a family
// - **DnsProvider**: Trait for fetching and updating the record via a provider API
// - **Reconciler**: Resolve → compare → (fetch → update) for a single run
// - **Scheduler**: Runs the reconciler immediately, then on a fixed interval
// - **ResolverState / ReconcilerState**: Process-lifetime caches
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP implementations
// 2. **Fewest Calls**: The provider is consulted only when the local IP changes
// 3. **Run Isolation**: Every per-run failure ends that run and nothing else
// 4. **Library-First**: The daemon is a thin driver over this crate

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use traits::{IpResolver, DnsProvider, ResolvedAddress, RemoteRecord, RecordUpdate, AUTO_TTL};
pub use engine::{Reconciler, RunOutcome, Scheduler, Stage};
pub use config::{DdnsConfig, IpVersion, RecordType};
pub use error::{Error, Result};
pub use state::{ReconcilerState, ResolverState};
