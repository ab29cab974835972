use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{BackoffKind, UploadConfig};

/// A single failed attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryAttempt {
    /// 1-based attempt number.
    pub attempt: u8,
    /// Error message from the failed attempt.
    pub error: String,
    /// When this attempt failed.
    pub timestamp: DateTime<Utc>,
}

impl RetryAttempt {
    pub fn new(attempt: u8, error: impl Into<String>) -> Self {
        Self {
            attempt,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of recording a failure in a [`RetryState`].
#[derive(Debug, Clone)]
pub enum RetryDecision {
    /// Sleep for `delay`, then run attempt number `next_attempt`.
    Retry { next_attempt: u8, delay: Duration },
    /// No attempts left.
    Exhausted { history: Vec<RetryAttempt> },
}

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    Exponential { base_ms: u64, max_ms: u64 },
}

impl Backoff {
    /// Delay to wait after `attempt` failed.
    pub fn delay(&self, attempt: u8) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base_ms, max_ms } => calculate_backoff(attempt, base_ms, max_ms),
        }
    }
}

/// Bounded-attempt retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Always at least 1.
    pub max_attempts: u8,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn fixed(max_attempts: u8, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Backoff::Fixed(delay),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        let backoff = match config.backoff {
            BackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(config.retry_delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base_ms: config.retry_delay_ms,
                max_ms: config.retry_max_delay_ms,
            },
        };
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    /// Three attempts, one second apart.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

/// Attempt counter for one retried operation.
///
/// `start_attempt` moves to the next attempt, `record_failure` decides whether
/// another one is allowed. The state is terminal once `Exhausted` was returned.
#[derive(Debug, Clone)]
pub struct RetryState {
    policy: RetryPolicy,
    attempt: u8,
    history: Vec<RetryAttempt>,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            history: Vec::new(),
        }
    }

    /// Begin the next attempt and return its 1-based number.
    pub fn start_attempt(&mut self) -> u8 {
        self.attempt = self.attempt.saturating_add(1);
        self.attempt
    }

    /// Record that the current attempt failed.
    pub fn record_failure(&mut self, error: &str) -> RetryDecision {
        self.history.push(RetryAttempt::new(self.attempt, error));

        if self.attempt < self.policy.max_attempts {
            RetryDecision::Retry {
                next_attempt: self.attempt + 1,
                delay: self.policy.backoff.delay(self.attempt),
            }
        } else {
            RetryDecision::Exhausted {
                history: self.history.clone(),
            }
        }
    }

    /// Number of attempts started so far.
    pub fn attempts(&self) -> u8 {
        self.attempt
    }

    pub fn history(&self) -> &[RetryAttempt] {
        &self.history
    }
}

/// Calculate exponential backoff delay with jitter.
///
/// Formula: `min(base_ms * 2^(attempt-1) + jitter, max_ms)` (0-25% jitter)
pub fn calculate_backoff(attempt: u8, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exp_factor = 2u64.saturating_pow((attempt - 1) as u32);
    let delay_ms = base_ms.saturating_mul(exp_factor);

    let jitter = if delay_ms > 0 {
        rand::rng().random_range(0..=delay_ms / 4)
    } else {
        0
    };

    let total_delay = delay_ms.saturating_add(jitter).min(max_ms);
    Duration::from_millis(total_delay)
}
