//! Waiting for server-side asynchronous work to settle.
//!
//! Several operations (document creation, version processing, uploads,
//! publishing) return before the server has finished. The [`Waiter`] polls
//! a probe at a fixed interval until it reports a terminal state, within a
//! bounded number of attempts and total time, and can be cancelled.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use ubq_core::config::PollingConfig;
use ubq_core::error::{UbqError, UbqResult};
use ubq_models::{Settlement, Settles};

/// What a single probe observed.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    /// Not finished; probe again.
    Pending,
    /// Finished successfully with this snapshot.
    Ready(T),
    /// Finished with a failure; this is the last snapshot.
    Failed(T),
}

impl<T: Settles> PollStatus<T> {
    /// Classify a snapshot by its own settlement state.
    pub fn from_snapshot(snapshot: T) -> Self {
        match snapshot.settlement() {
            Settlement::Pending => PollStatus::Pending,
            Settlement::Ready => PollStatus::Ready(snapshot),
            Settlement::Failed => PollStatus::Failed(snapshot),
        }
    }
}

/// Bounds and pacing for one wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Fixed delay between probes.
    pub interval: Duration,
    /// Maximum number of probes.
    pub max_attempts: u32,
    /// Maximum time spent waiting.
    pub max_duration: Duration,
    /// Consecutive transient probe failures tolerated.
    pub transient_error_budget: u32,
}

impl WaitPolicy {
    /// Policy for quick transitions (version creation, readiness).
    pub fn fast(config: &PollingConfig) -> Self {
        Self::with_interval(config, config.fast_interval())
    }

    /// Policy for slow transitions (upload processing, publishing).
    pub fn slow(config: &PollingConfig) -> Self {
        Self::with_interval(config, config.slow_interval())
    }

    fn with_interval(config: &PollingConfig, interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: config.max_attempts.max(1),
            max_duration: config.max_wait(),
            transient_error_budget: config.transient_error_budget,
        }
    }

    /// Set the delay between probes.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Cap the number of probes; never below one.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Cap the total time spent waiting, in-flight probes included.
    pub fn max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = duration;
        self
    }

    /// Set how many consecutive transient failures are tolerated.
    pub fn transient_error_budget(mut self, budget: u32) -> Self {
        self.transient_error_budget = budget;
        self
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::fast(&PollingConfig::default())
    }
}

/// Polls a probe until it settles.
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    policy: WaitPolicy,
    cancel: CancellationToken,
}

impl Waiter {
    /// Create a waiter with its own cancellation token.
    pub fn new(policy: WaitPolicy) -> Self {
        Self {
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort the wait when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The bounds this waiter applies.
    pub fn policy(&self) -> &WaitPolicy {
        &self.policy
    }

    /// Token that cancels waits run by this waiter (and its clones).
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Probe until the operation settles.
    ///
    /// * `Ready(t)` returns `t`.
    /// * `Failed(t)` returns `OperationFailed` carrying `t`; no further probes.
    /// * Transient errors (network, gateway statuses) are retried while the
    ///   consecutive-failure budget lasts; any other error is returned as-is.
    /// * Running out of attempts or time returns `WaitExhausted`; the time
    ///   bound also cuts short a probe that is still in flight.
    /// * Cancellation returns `Cancelled`, including mid-probe and mid-sleep.
    pub async fn wait<T, F, Fut>(&self, operation: &str, mut probe: F) -> UbqResult<T>
    where
        T: Serialize,
        F: FnMut() -> Fut,
        Fut: Future<Output = UbqResult<PollStatus<T>>>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut transient_failures: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(UbqError::Cancelled(operation.to_string()));
            }

            attempts += 1;
            let remaining = self.policy.max_duration.saturating_sub(started.elapsed());
            let outcome = tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(UbqError::Cancelled(operation.to_string()));
                }
                outcome = tokio::time::timeout(remaining, probe()) => outcome,
            };
            let Ok(outcome) = outcome else {
                return Err(self.exhausted(operation, attempts, started));
            };

            match outcome {
                Ok(PollStatus::Ready(snapshot)) => {
                    info!(operation, attempts, "operation settled");
                    return Ok(snapshot);
                }
                Ok(PollStatus::Failed(snapshot)) => {
                    warn!(operation, attempts, "operation reported failure");
                    let snapshot = serde_json::to_value(&snapshot)?;
                    return Err(UbqError::OperationFailed {
                        operation: operation.to_string(),
                        snapshot: Box::new(snapshot),
                    });
                }
                Ok(PollStatus::Pending) => {
                    transient_failures = 0;
                    debug!(operation, attempts, "still pending");
                }
                Err(e) if e.is_transient() && transient_failures < self.policy.transient_error_budget => {
                    transient_failures += 1;
                    warn!(
                        operation,
                        attempts,
                        transient_failures,
                        error = %e,
                        "probe failed, will retry"
                    );
                }
                Err(e) => return Err(e),
            }

            if attempts >= self.policy.max_attempts
                || started.elapsed() + self.policy.interval > self.policy.max_duration
            {
                return Err(self.exhausted(operation, attempts, started));
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    return Err(UbqError::Cancelled(operation.to_string()));
                }
                _ = tokio::time::sleep(self.policy.interval) => {}
            }
        }
    }

    fn exhausted(&self, operation: &str, attempts: u32, started: Instant) -> UbqError {
        let elapsed = started.elapsed();
        warn!(operation, attempts, ?elapsed, "gave up waiting");
        UbqError::WaitExhausted {
            operation: operation.to_string(),
            attempts,
            elapsed,
        }
    }
}
