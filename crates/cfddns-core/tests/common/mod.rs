//! Test doubles and common utilities for reconciler contract tests
//!
//! The doubles count every call so tests can assert on exactly which
//! collaborators a run touched.

#![allow(dead_code)]

use cfddns_core::error::{Error, Result};
use cfddns_core::traits::{DnsProvider, IpResolver, RecordUpdate, RemoteRecord, ResolvedAddress};
use cfddns_core::{DdnsConfig, RecordType};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// An IpResolver that answers from a script, then repeats its fallback
pub struct ScriptedResolver {
    /// Queued answers; `None` means "all services failed"
    script: Arc<std::sync::Mutex<VecDeque<Option<String>>>>,
    /// Answer once the script is exhausted
    fallback: Option<String>,
    /// Simulated latency per call
    delay: Duration,
    /// Call counter for resolve()
    resolve_call_count: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    /// Always resolve to `ip`
    pub fn fixed(ip: &str) -> Self {
        Self {
            script: Arc::new(std::sync::Mutex::new(VecDeque::new())),
            fallback: Some(ip.to_string()),
            delay: Duration::ZERO,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always fail as if every lookup service were down
    pub fn unavailable() -> Self {
        Self {
            script: Arc::new(std::sync::Mutex::new(VecDeque::new())),
            fallback: None,
            delay: Duration::ZERO,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `answers` in order before falling back
    pub fn then(self, answers: &[Option<&str>]) -> Self {
        {
            let mut script = self.script.lock().unwrap();
            for answer in answers {
                script.push_back(answer.map(str::to_string));
            }
        }
        self
    }

    /// Take `delay` to answer each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Create a resolver that shares script and counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            fallback: other.fallback.clone(),
            delay: other.delay,
            resolve_call_count: Arc::clone(&other.resolve_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpResolver for ScriptedResolver {
    async fn resolve(&self, record_type: RecordType) -> Result<ResolvedAddress> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let answer = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        answer
            .and_then(|ip| ResolvedAddress::parse(&ip, record_type))
            .ok_or(Error::NoServiceAvailable {
                record_type,
                attempted: 3,
            })
    }
}

/// How the mock provider should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Transport,
    Rejected,
    NotFound,
}

impl Failure {
    fn to_error(self) -> Error {
        match self {
            Failure::Transport => Error::http("connection reset"),
            Failure::Rejected => Error::provider("mock", "success=false"),
            Failure::NotFound => Error::not_found("home.example.com (A)"),
        }
    }
}

/// A mock DnsProvider that stores one record and tracks calls
pub struct MockDnsProvider {
    /// The provider-side record
    record: Arc<std::sync::Mutex<RemoteRecord>>,
    /// Failure injected into fetch_record()
    fetch_failure: Arc<std::sync::Mutex<Option<Failure>>>,
    /// Failure injected into update_record()
    update_failure: Arc<std::sync::Mutex<Option<Failure>>>,
    /// Call counter for fetch_record()
    fetch_call_count: Arc<AtomicUsize>,
    /// Recorded payloads from update calls
    updates: Arc<std::sync::Mutex<Vec<(String, RecordUpdate)>>>,
}

impl MockDnsProvider {
    /// A provider holding an A record with `content`
    pub fn with_content(content: &str) -> Self {
        Self::with_record(RemoteRecord {
            id: "rec-1".to_string(),
            name: "home.example.com".to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl: 300,
            proxied: Some(false),
        })
    }

    /// A provider holding `record`
    pub fn with_record(record: RemoteRecord) -> Self {
        Self {
            record: Arc::new(std::sync::Mutex::new(record)),
            fetch_failure: Arc::new(std::sync::Mutex::new(None)),
            update_failure: Arc::new(std::sync::Mutex::new(None)),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Make fetch_record() fail (or succeed again with `None`)
    pub fn fail_fetch(&self, failure: Option<Failure>) {
        *self.fetch_failure.lock().unwrap() = failure;
    }

    /// Make update_record() fail (or succeed again with `None`)
    pub fn fail_update(&self, failure: Option<Failure>) {
        *self.update_failure.lock().unwrap() = failure;
    }

    /// Change the record behind the reconciler's back
    pub fn set_content(&self, content: &str) {
        self.record.lock().unwrap().content = content.to_string();
    }

    /// Current provider-side content
    pub fn content(&self) -> String {
        self.record.lock().unwrap().content.clone()
    }

    /// Get the number of times fetch_record() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get the (record id, payload) pairs sent to update_record()
    pub fn updates(&self) -> Vec<(String, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    /// Create a provider that shares record, failures and counters
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            record: Arc::clone(&other.record),
            fetch_failure: Arc::clone(&other.fetch_failure),
            update_failure: Arc::clone(&other.update_failure),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            updates: Arc::clone(&other.updates),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn fetch_record(&self, _record_name: &str, _record_type: RecordType) -> Result<RemoteRecord> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = *self.fetch_failure.lock().unwrap() {
            return Err(failure.to_error());
        }
        Ok(self.record.lock().unwrap().clone())
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<()> {
        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), update.clone()));
        if let Some(failure) = *self.update_failure.lock().unwrap() {
            return Err(failure.to_error());
        }
        self.record.lock().unwrap().content = update.content.clone();
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config() -> DdnsConfig {
    DdnsConfig::new("test-token", "zone-1", "home.example.com", RecordType::A)
}
