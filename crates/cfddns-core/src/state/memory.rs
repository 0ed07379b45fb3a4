// # In-Memory State
//
// Both state objects are cheap handles over an `Arc<RwLock<..>>`: cloning a
// handle shares the underlying value, so the owner (resolver or reconciler)
// and an observer (tests, diagnostics) see the same cache.
//
// ## Crash Behavior
//
// - All state is lost on restart/crash
// - First run after a restart always consults the provider
// - The sticky endpoint is forgotten, so the first lookup walks the list

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sticky-endpoint cache for an IP resolver
///
/// Initialized empty, overwritten on every successful resolution, never
/// cleared.
#[derive(Debug, Clone, Default)]
pub struct ResolverState {
    inner: Arc<RwLock<Option<String>>>,
}

impl ResolverState {
    /// Create an empty resolver state
    pub fn new() -> Self {
        Self::default()
    }

    /// The endpoint that answered last, if any
    pub async fn sticky_endpoint(&self) -> Option<String> {
        self.inner.read().await.clone()
    }

    /// Remember `endpoint` as the one to try first next time
    pub async fn set_sticky_endpoint(&self, endpoint: impl Into<String>) {
        *self.inner.write().await = Some(endpoint.into());
    }
}

/// A last-IP entry with the time it was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedIp {
    /// The address known to match the remote record
    pub ip: String,
    /// When it was recorded
    pub synced_at: DateTime<Utc>,
}

/// Last-observed-IP cache for the reconciler
///
/// Set after a run finds the remote record already matching, or after a
/// successful update. Left untouched by failed runs.
#[derive(Debug, Clone, Default)]
pub struct ReconcilerState {
    inner: Arc<RwLock<Option<SyncedIp>>>,
}

impl ReconcilerState {
    /// Create an empty reconciler state
    pub fn new() -> Self {
        Self::default()
    }

    /// The last IP known to be in sync
    pub async fn last_ip(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|entry| entry.ip.clone())
    }

    /// The full cache entry, including when it was recorded
    pub async fn entry(&self) -> Option<SyncedIp> {
        self.inner.read().await.clone()
    }

    /// Whether `ip` equals the cached last IP
    pub async fn matches(&self, ip: &str) -> bool {
        self.inner
            .read()
            .await
            .as_ref()
            .is_some_and(|entry| entry.ip == ip)
    }

    /// Record `ip` as in sync with the remote record
    pub async fn set_last_ip(&self, ip: impl Into<String>) {
        *self.inner.write().await = Some(SyncedIp {
            ip: ip.into(),
            synced_at: Utc::now(),
        });
    }
}
