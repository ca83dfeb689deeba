use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Atomic counters of upstream outcomes, shared by every rotator of a client.
#[derive(Debug, Default)]
pub struct FetchStats {
    upstream_calls: AtomicU64,
    succeeded: AtomicU64,
    throttled: AtomicU64,
    daily_capped: AtomicU64,
    failed: AtomicU64,
    rotations: AtomicU64,
    backoffs: AtomicU64,
    total_backoff_ms: AtomicU64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_throttled(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_daily_cap(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        self.daily_capped.fetch_add(1, Ordering::Relaxed);
    }

    /// Transport errors, non-2xx statuses, unusable bodies and upstream
    /// parameter rejections.
    pub fn record_failure(&self) {
        self.upstream_calls.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backoff(&self, duration: Duration) {
        self.backoffs.fetch_add(1, Ordering::Relaxed);
        self.total_backoff_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Counter snapshot; cache counters are filled in by the client.
    pub fn snapshot(&self) -> FetchStatsSnapshot {
        FetchStatsSnapshot {
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            throttled: self.throttled.load(Ordering::Relaxed),
            daily_capped: self.daily_capped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            backoffs: self.backoffs.load(Ordering::Relaxed),
            total_backoff_ms: self.total_backoff_ms.load(Ordering::Relaxed),
            cache_hits: 0,
            cache_misses: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStatsSnapshot {
    pub upstream_calls: u64,
    pub succeeded: u64,
    pub throttled: u64,
    pub daily_capped: u64,
    pub failed: u64,
    pub rotations: u64,
    pub backoffs: u64,
    pub total_backoff_ms: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
