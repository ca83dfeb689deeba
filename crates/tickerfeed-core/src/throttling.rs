//! Per-credential sliding-window rate gate.
//!
//! Each credential owns a window of admission instants behind its own async
//! mutex, so a caller waiting on one key never blocks callers on another.
//! The gate delays, it never rejects.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::credential::Credential;

/// Default calls admitted per credential per window.
pub const DEFAULT_MAX_CALLS_PER_MINUTE: usize = 4;

/// Trailing window the ceiling applies to.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Added to every computed wait so the oldest entry has left the window on wake-up.
const ADMIT_EPSILON: Duration = Duration::from_millis(10);

type RateWindow = Arc<tokio::sync::Mutex<VecDeque<Instant>>>;

#[derive(Debug)]
pub struct RateGate {
    max_calls: usize,
    window: Duration,
    windows: Mutex<HashMap<Credential, RateWindow>>,
}

impl RateGate {
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(max_calls: usize) -> Self {
        Self::new(max_calls, RATE_WINDOW)
    }

    pub const fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Wait until `credential` has budget in its trailing window, then record
    /// one call.
    ///
    /// The window lock is released while sleeping and the window re-checked on
    /// wake-up, so concurrent waiters on one credential cannot overshoot the
    /// ceiling. Dropping the returned future abandons the wait without
    /// recording a call.
    pub async fn admit(&self, credential: &Credential) {
        let window = self.window_for(credential);
        loop {
            let mut calls = window.lock().await;
            let now = Instant::now();
            self.prune(&mut calls, now);

            let Some(&oldest) = calls.front().filter(|_| calls.len() >= self.max_calls) else {
                calls.push_back(now);
                return;
            };

            let wait = self.window.saturating_sub(now.duration_since(oldest)) + ADMIT_EPSILON;
            drop(calls);

            debug!(
                credential = %credential,
                wait_ms = wait.as_millis() as u64,
                "rate gate full, delaying call"
            );
            sleep(wait).await;
        }
    }

    /// Calls still available to `credential` in the current window.
    pub async fn remaining(&self, credential: &Credential) -> usize {
        let window = self.window_for(credential);
        let mut calls = window.lock().await;
        self.prune(&mut calls, Instant::now());
        self.max_calls.saturating_sub(calls.len())
    }

    fn prune(&self, calls: &mut VecDeque<Instant>, now: Instant) {
        while calls
            .front()
            .is_some_and(|&at| now.duration_since(at) >= self.window)
        {
            calls.pop_front();
        }
    }

    fn window_for(&self, credential: &Credential) -> RateWindow {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            windows
                .entry(credential.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(VecDeque::new()))),
        )
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::per_minute(DEFAULT_MAX_CALLS_PER_MINUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> Credential {
        Credential::new(name)
    }

    #[tokio::test(start_paused = true)]
    async fn admits_immediately_under_ceiling() {
        let gate = RateGate::per_minute(4);
        let start = Instant::now();

        for _ in 0..4 {
            gate.admit(&key("alpha")).await;
        }

        assert_eq!(Instant::now(), start);
        assert_eq!(gate.remaining(&key("alpha")).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn delays_until_oldest_call_leaves_window() {
        let gate = RateGate::per_minute(2);
        let start = Instant::now();

        gate.admit(&key("alpha")).await;
        tokio::time::advance(Duration::from_secs(20)).await;
        gate.admit(&key("alpha")).await;
        gate.admit(&key("alpha")).await;

        let waited = Instant::now().duration_since(start);
        assert!(waited >= RATE_WINDOW, "waited only {waited:?}");
        assert!(waited < RATE_WINDOW + Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn never_admits_more_than_ceiling_in_any_trailing_window() {
        let gate = RateGate::per_minute(4);
        let mut admitted = Vec::new();

        for call in 0..13 {
            if call % 3 == 0 {
                tokio::time::advance(Duration::from_secs(7)).await;
            }
            gate.admit(&key("alpha")).await;
            admitted.push(Instant::now());
        }

        for (index, &at) in admitted.iter().enumerate() {
            let in_window = admitted[..=index]
                .iter()
                .filter(|&&earlier| at.duration_since(earlier) < RATE_WINDOW)
                .count();
            assert!(in_window <= 4, "call {index} saw {in_window} calls in window");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn credentials_do_not_share_windows() {
        let gate = RateGate::per_minute(1);
        let start = Instant::now();

        gate.admit(&key("alpha")).await;
        gate.admit(&key("beta")).await;

        assert_eq!(Instant::now(), start);
        assert_eq!(gate.remaining(&key("alpha")).await, 0);
        assert_eq!(gate.remaining(&key("gamma")).await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_waiters_respect_ceiling() {
        let gate = Arc::new(RateGate::per_minute(2));
        let start = Instant::now();

        let handles = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move {
                    gate.admit(&key("alpha")).await;
                    Instant::now()
                })
            })
            .collect::<Vec<_>>();

        let mut admitted = Vec::new();
        for handle in handles {
            admitted.push(handle.await.expect("task should not panic"));
        }
        admitted.sort();

        assert_eq!(admitted[1], start);
        assert!(admitted[2].duration_since(start) >= RATE_WINDOW);
        assert!(admitted[3].duration_since(start) >= RATE_WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_wait_records_no_call() {
        let gate = RateGate::per_minute(1);
        gate.admit(&key("alpha")).await;

        let waited = tokio::time::timeout(Duration::from_secs(5), gate.admit(&key("alpha"))).await;
        assert!(waited.is_err(), "second call should still be waiting");

        tokio::time::advance(RATE_WINDOW).await;
        assert_eq!(gate.remaining(&key("alpha")).await, 1);
    }

    #[test]
    fn zero_ceiling_is_clamped_to_one() {
        assert_eq!(RateGate::per_minute(0).max_calls(), 1);
    }
}
