use std::{ops::RangeInclusive, thread, time::Duration};

use log::{debug, error};

use crate::BatchError;

use super::random::RandomSource;

/// Result of delivering one chunk through a [`RetryPolicy`].
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Exhausted { attempts: u32, last_error: BatchError },
}

impl DeliveryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Delivered { attempts } => *attempts,
            DeliveryOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Bounded retry with a randomized pause between attempts.
///
/// Every error is retried the same way: the policy does not tell transient
/// failures from permanent ones.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: RangeInclusive<u64>,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: 1..=10,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self::default().max_attempts(max_attempts)
    }

    /// Sets the attempt limit; at least one attempt is always made.
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Range of units drawn for the pause after a failed attempt.
    pub fn backoff(mut self, backoff: RangeInclusive<u64>) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn get_max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Calls `attempt` until it succeeds or the attempt limit is reached.
    ///
    /// The closure receives the 1-based attempt number. No pause follows the
    /// last failed attempt.
    pub fn execute<F>(&self, random: &RandomSource, mut attempt: F) -> DeliveryOutcome
    where
        F: FnMut(u32) -> Result<(), BatchError>,
    {
        let mut number = 1;
        loop {
            match attempt(number) {
                Ok(()) => return DeliveryOutcome::Delivered { attempts: number },
                Err(err) => {
                    error!("Attempt {}/{} failed: {}", number, self.max_attempts, err);

                    if number >= self.max_attempts {
                        return DeliveryOutcome::Exhausted {
                            attempts: number,
                            last_error: err,
                        };
                    }

                    let pause = self.pause(random);
                    debug!("Retrying in {:?}", pause);
                    thread::sleep(pause);
                    number += 1;
                }
            }
        }
    }

    fn pause(&self, random: &RandomSource) -> Duration {
        if self.backoff.is_empty() || self.backoff_unit.is_zero() {
            return Duration::ZERO;
        }
        let units = random.range(self.backoff.clone());
        self.backoff_unit
            .saturating_mul(u32::try_from(units).unwrap_or(u32::MAX))
    }
}
