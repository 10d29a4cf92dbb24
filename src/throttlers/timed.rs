use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// A sliding-window budget: at most `threshold` acquires per trailing
/// window.
///
/// With a nonzero quantum the window decays in sub-window steps, each step
/// returning a proportional share of the budget, so a burst early in one
/// quantum cannot starve the next. Without one the whole budget returns at
/// once when the window turns over. Decay is applied lazily under the
/// caller's lock; two calls separated by more than the window always see
/// independent budgets. Release is a no-op.
pub struct Timed {
    threshold: u64,
    step: Duration,
    decay: u64,
    window: Mutex<Window>,
}

struct Window {
    count: u64,
    decayed_at: Instant,
}

impl Timed {
    pub fn new(threshold: u64, window: Duration, quantum: Duration) -> Self {
        assert!(threshold > 0);
        assert!(window > Duration::ZERO);

        let (step, decay) = if quantum > Duration::ZERO && quantum < window {
            let buckets = (window.as_nanos() / quantum.as_nanos()) as u64;
            (quantum, threshold.div_ceil(buckets))
        } else {
            (window, threshold)
        };
        Self {
            threshold,
            step,
            decay,
            window: Mutex::new(Window {
                count: 0,
                decayed_at: Instant::now(),
            }),
        }
    }
}

#[async_trait]
impl Throttler for Timed {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let mut window = self.window.lock().unwrap();
        let elapsed = window.decayed_at.elapsed();
        if elapsed >= self.step {
            let steps = (elapsed.as_nanos() / self.step.as_nanos()) as u32;
            window.count = window
                .count
                .saturating_sub(self.decay.saturating_mul(u64::from(steps)));
            window.decayed_at += self.step * steps;
        }
        if window.count >= self.threshold {
            return Err(Error::TimedThreshold);
        }
        window.count += 1;
        Ok(())
    }
}
