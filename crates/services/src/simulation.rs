//! Building blocks shared by the simulated wizard actions: pluggable outcomes,
//! per-action latency profiles, and cancellable delays.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;

use crate::error::ActionError;

/// Decides whether a simulated action succeeds.
pub trait OutcomeProvider: Send + Sync {
    /// Returns `true` with the given probability (clamped to `0.0..=1.0`).
    fn succeeds(&self, probability: f64) -> bool;
}

/// Rolls against the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOutcomes;

impl OutcomeProvider for RandomOutcomes {
    fn succeeds(&self, probability: f64) -> bool {
        let p = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        rand::rng().random_bool(p)
    }
}

/// Ignores the probability and always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedOutcomes {
    succeed: bool,
}

impl FixedOutcomes {
    #[must_use]
    pub fn always_succeed() -> Self {
        Self { succeed: true }
    }

    #[must_use]
    pub fn always_fail() -> Self {
        Self { succeed: false }
    }
}

impl OutcomeProvider for FixedOutcomes {
    fn succeeds(&self, _probability: f64) -> bool {
        self.succeed
    }
}

/// Replays queued answers in order, then falls back to a default.
#[derive(Debug, Default)]
pub struct ScriptedOutcomes {
    queue: Mutex<VecDeque<bool>>,
    fallback: bool,
}

impl ScriptedOutcomes {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            queue: Mutex::new(script.into_iter().collect()),
            fallback,
        }
    }

    /// Number of scripted answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.lock().map_or(0, |queue| queue.len())
    }
}

impl OutcomeProvider for ScriptedOutcomes {
    fn succeeds(&self, _probability: f64) -> bool {
        self.queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or(self.fallback)
    }
}

/// Latency and success probability of one simulated action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProfile {
    pub latency: Duration,
    pub success_rate: f64,
}

impl ActionProfile {
    #[must_use]
    pub const fn new(latency_ms: u64, success_rate: f64) -> Self {
        Self {
            latency: Duration::from_millis(latency_ms),
            success_rate,
        }
    }

    #[must_use]
    pub const fn instant(self) -> Self {
        Self {
            latency: Duration::ZERO,
            success_rate: self.success_rate,
        }
    }
}

/// Timing and odds for every simulated action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationProfile {
    pub whitelist: ActionProfile,
    pub key_generation: ActionProfile,
    pub deployment_config: ActionProfile,
    /// `success_rate` applies to the `/on_subscribe` check only.
    pub endpoint_test: ActionProfile,
    pub subscription: ActionProfile,
    pub header_create: ActionProfile,
    /// `success_rate` is the odds the signature check passes.
    pub header_verify: ActionProfile,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            whitelist: ActionProfile::new(2000, 1.0),
            key_generation: ActionProfile::new(1500, 1.0),
            deployment_config: ActionProfile::new(500, 1.0),
            endpoint_test: ActionProfile::new(2000, 0.8),
            subscription: ActionProfile::new(3000, 1.0),
            header_create: ActionProfile::new(1200, 1.0),
            header_verify: ActionProfile::new(1800, 0.8),
        }
    }
}

impl SimulationProfile {
    /// Default odds with every latency set to zero.
    #[must_use]
    pub fn instant() -> Self {
        let base = Self::default();
        Self {
            whitelist: base.whitelist.instant(),
            key_generation: base.key_generation.instant(),
            deployment_config: base.deployment_config.instant(),
            endpoint_test: base.endpoint_test.instant(),
            subscription: base.subscription.instant(),
            header_create: base.header_create.instant(),
            header_verify: base.header_verify.instant(),
        }
    }
}

/// Owner side of a cancellation pair.
///
/// Dropping the handle does not cancel outstanding tokens.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side of a cancellation pair; cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelHandle {
    #[must_use]
    pub fn pair() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (Self { tx }, CancelToken { rx })
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token nobody can cancel.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled; pends forever if the handle is dropped first.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Wait out a simulated latency unless `token` is cancelled first.
///
/// # Errors
///
/// Returns `ActionError::Cancelled` if the token is or becomes cancelled.
pub async fn simulate_latency(latency: Duration, token: &CancelToken) -> Result<(), ActionError> {
    if token.is_cancelled() {
        return Err(ActionError::Cancelled);
    }
    if latency.is_zero() {
        return Ok(());
    }
    tokio::select! {
        () = tokio::time::sleep(latency) => Ok(()),
        () = token.cancelled() => Err(ActionError::Cancelled),
    }
}
