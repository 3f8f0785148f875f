//! Simulated provisioning delay.
//!
//! Every accepted transition waits a randomized duration before committing
//! its final status. The duration source is a trait so tests can substitute a
//! deterministic implementation and make timing assertions exact.

use std::time::Duration;

use rand::Rng;

/// Source of simulated transition durations.
pub trait TransitionTimer: Send + Sync {
    /// The total duration of one transition sequence.
    ///
    /// A plain start or stop waits this long before its final status write; a
    /// restart splits it in half across its two legs.
    fn transition_duration(&self) -> Duration;
}

/// Production duration source: a fixed base plus a uniformly random extra.
///
/// Defaults to 10 seconds base with up to 10 seconds of jitter, so a
/// transition takes 10–20 seconds.
#[derive(Debug, Clone, Copy)]
pub struct RandomTimer {
    base: Duration,
    jitter: Duration,
}

impl RandomTimer {
    /// Create a timer with the given base duration and jitter ceiling.
    #[must_use]
    pub const fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }
}

impl Default for RandomTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(10))
    }
}

impl TransitionTimer for RandomTimer {
    fn transition_duration(&self) -> Duration {
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..jitter_ms)
        };
        self.base + Duration::from_millis(extra)
    }
}

/// Deterministic duration source for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimer(Duration);

impl FixedTimer {
    /// Create a timer that always reports the given duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }
}

impl TransitionTimer for FixedTimer {
    fn transition_duration(&self) -> Duration {
        self.0
    }
}
