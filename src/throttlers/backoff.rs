use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Sleeps for a growing, capped delay on every acquire.
///
/// The attempt counter advances once per acquire and wraps back to zero as
/// soon as the next delay would overshoot the cap, so the sequence of
/// pauses cycles. With `base = 1ms`, `cap = 20ms` and quadratic growth the
/// pauses run 1, 4, 9, 16, 1, … milliseconds. Release never resets the
/// counter.
pub struct Backoff {
    base: Duration,
    cap: Duration,
    quadratic: bool,
    attempts: AtomicU64,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration, quadratic: bool) -> Self {
        Self {
            base,
            cap,
            quadratic,
            attempts: AtomicU64::new(0),
        }
    }

    /// The uncapped delay for a given attempt.
    fn delay(&self, attempt: u64) -> Duration {
        let step = attempt.saturating_add(1);
        let factor = if self.quadratic {
            step.saturating_mul(step)
        } else {
            step
        };
        self.base
            .saturating_mul(u32::try_from(factor).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl Throttler for Backoff {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        // claim a distinct attempt per caller, wrapping once the next
        // delay would pass the cap
        let mut curr = self.attempts.load(Ordering::Acquire);
        let attempt = loop {
            let next = if self.delay(curr + 1) > self.cap {
                0
            } else {
                curr + 1
            };
            match self
                .attempts
                .compare_exchange(curr, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break curr,
                Err(actual) => curr = actual,
            }
        };
        ctx.suspend(sleep(self.delay(attempt).min(self.cap))).await
    }
}
