//! Reconciliation engine
//!
//! The [`Reconciler`] is responsible for:
//! - Resolving the current public IP via [`IpResolver`]
//! - Skipping the provider entirely when the IP matches the last synced one
//! - Fetching the remote record via [`DnsProvider`]
//! - Updating the record when its content differs
//! - Caching the synced IP after a match or a successful update
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Scheduler  │─── immediate + every interval ───┐
//! └─────────────┘                                   │
//!                                                   ▼
//!                                          ┌──────────────┐
//!                                          │  Reconciler  │
//!                                          └──────────────┘
//!                                                   │
//!         ┌─────────────────────────┬───────────────┴──────────┐
//!         │                         │                          │
//!         ▼                         ▼                          ▼
//! ┌─────────────┐         ┌──────────────────┐        ┌─────────────────┐
//! │ IpResolver  │         │ ReconcilerState  │        │  DnsProvider    │
//! │ (resolve)   │         │ (short circuit)  │        │ (fetch/update)  │
//! └─────────────┘         └──────────────────┘        └─────────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve the public IP; abort on failure
//! 2. Equal to the cached last IP: stop, provider untouched
//! 3. Fetch the remote record; abort on failure
//! 4. Content equal: cache the IP
//! 5. Content differs: update, and cache the IP only if the update succeeded
//!
//! A remote record edited out-of-band is not noticed while the local IP stays
//! the same, because step 2 never reaches the provider.

pub mod scheduler;

pub use scheduler::{MIN_INTERVAL, Scheduler};

use crate::config::DdnsConfig;
use crate::error::{Error, Result};
use crate::state::ReconcilerState;
use crate::traits::{DnsProvider, IpResolver, RecordUpdate};
use std::fmt;
use tracing::{debug, info, warn};

/// Stage of a run that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Public IP resolution
    Resolve,
    /// Remote record fetch
    Fetch,
    /// Remote record update
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
            Stage::Update => "update",
        })
    }
}

/// Terminal outcome of one reconciliation run
#[derive(Debug)]
pub enum RunOutcome {
    /// IP equals the cached last IP; the provider was not contacted
    Cached {
        ip: String,
    },

    /// Remote record already had the IP; cache resynchronised
    InSync {
        ip: String,
    },

    /// Remote record was moved to the new IP
    Updated {
        previous: String,
        ip: String,
    },

    /// The run stopped at `stage`
    Failed {
        stage: Stage,
        error: Error,
    },
}

impl RunOutcome {
    /// Whether the run ended in a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    /// The failed stage, if any
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            RunOutcome::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Core reconciler
///
/// Owns the collaborators and the last-IP cache. Runs are sequential; the
/// scheduler never starts a run while another is in flight.
pub struct Reconciler {
    /// Public IP source
    resolver: Box<dyn IpResolver>,

    /// DNS provider for fetching and updating the record
    provider: Box<dyn DnsProvider>,

    /// Record to keep in sync
    config: DdnsConfig,

    /// Last IP known to be in sync
    state: ReconcilerState,
}

impl Reconciler {
    /// Create a new reconciler with an empty cache
    ///
    /// Fails only if `config` does not validate.
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver,
            provider,
            config,
            state: ReconcilerState::new(),
        })
    }

    /// Use `state` as the last-IP cache
    pub fn with_state(mut self, state: ReconcilerState) -> Self {
        self.state = state;
        self
    }

    /// The last-IP cache
    pub fn state(&self) -> &ReconcilerState {
        &self.state
    }

    /// The configuration this reconciler runs against
    pub fn config(&self) -> &DdnsConfig {
        &self.config
    }

    /// Perform one reconciliation run
    ///
    /// Never fails: every error is logged and folded into
    /// [`RunOutcome::Failed`].
    pub async fn run_once(&self) -> RunOutcome {
        info!(
            "Starting IP address check for {} ({})",
            self.config.record_name, self.config.record_type
        );

        let outcome = match self.reconcile().await {
            Ok(outcome) => outcome,
            Err((stage, error)) => RunOutcome::Failed { stage, error },
        };

        match &outcome {
            RunOutcome::Cached { ip } => {
                info!("IP {} unchanged since last sync, skipping provider check", ip)
            }
            RunOutcome::InSync { ip } => {
                info!("Record {} already points at {}, no update needed", self.config.record_name, ip)
            }
            RunOutcome::Updated { previous, ip } => {
                info!("Record {} updated: {} -> {}", self.config.record_name, previous, ip)
            }
            RunOutcome::Failed { stage, error } => {
                warn!("Run aborted at {} stage: {}", stage, error)
            }
        }

        outcome
    }

    async fn reconcile(&self) -> std::result::Result<RunOutcome, (Stage, Error)> {
        let record_type = self.config.record_type;

        let address = self
            .resolver
            .resolve(record_type)
            .await
            .map_err(|e| (Stage::Resolve, e))?;
        info!("Current public IP: {}", address);

        if self.state.matches(address.as_str()).await {
            return Ok(RunOutcome::Cached {
                ip: address.into_string(),
            });
        }

        let existing = self
            .provider
            .fetch_record(&self.config.record_name, record_type)
            .await
            .map_err(|e| (Stage::Fetch, e))?;
        info!(
            "{} record content: {} (id {})",
            self.provider.provider_name(),
            existing.content,
            existing.id
        );

        if existing.content == address.as_str() {
            self.state.set_last_ip(address.as_str()).await;
            return Ok(RunOutcome::InSync {
                ip: address.into_string(),
            });
        }

        info!(
            "IP address changed from {} to {}, updating",
            existing.content, address
        );
        let update = RecordUpdate::merge(&self.config, &existing, address.as_str());
        debug!(
            "Update payload: ttl={} proxied={:?}",
            update.ttl, update.proxied
        );

        self.provider
            .update_record(&existing.id, &update)
            .await
            .map_err(|e| (Stage::Update, e))?;

        self.state.set_last_ip(address.as_str()).await;
        Ok(RunOutcome::Updated {
            previous: existing.content,
            ip: address.into_string(),
        })
    }
}
