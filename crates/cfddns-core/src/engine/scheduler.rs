//! Periodic driver for the reconciler
//!
//! Runs once immediately, then once per interval, until the shutdown future
//! resolves. Shutdown is observed only between runs.

use super::Reconciler;
use crate::config::DdnsConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{info, warn};

/// Shortest interval the scheduler will tick at
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Fixed-interval scheduler
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler ticking every `interval`
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!(
                "Check interval {:?} is too short, using {:?}",
                interval, MIN_INTERVAL
            );
        }
        Self {
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Create a scheduler using the configured check interval
    pub fn from_config(config: &DdnsConfig) -> Self {
        Self::new(Duration::from_secs(config.check_interval_secs()))
    }

    /// The interval between runs
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `reconciler` until `shutdown` resolves
    ///
    /// Returns the number of runs performed. A tick that falls due while a
    /// run is in flight is delayed rather than queued.
    pub async fn run_until<F>(&self, reconciler: &Reconciler, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(timer);
        tokio::pin!(shutdown);

        // First tick completes immediately
        ticks.next().await;
        reconciler.run_once().await;
        let mut runs = 1;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after {} run(s)", runs);
                    break;
                }
                tick = ticks.next() => {
                    if tick.is_none() {
                        break;
                    }
                }
            }

            info!("Scheduled check triggered {}", runs);
            reconciler.run_once().await;
            runs += 1;
        }

        runs
    }
}
