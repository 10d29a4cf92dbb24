use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Caps the number of calls in flight, rejecting the excess outright.
///
/// Unlike [Buffered](crate::throttlers::Buffered) nothing ever waits here:
/// once `threshold` acquires are unreleased, further acquires fail without
/// touching the counter.
pub struct Running {
    threshold: u64,
    running: AtomicU64,
}

impl Running {
    pub fn new(threshold: u64) -> Self {
        assert!(threshold > 0);

        Self {
            threshold,
            running: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Throttler for Running {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let mut curr = self.running.load(Ordering::Acquire);
        loop {
            if curr >= self.threshold {
                return Err(Error::RunningThreshold);
            }
            match self
                .running
                .compare_exchange(curr, curr + 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(()),
                Err(actual) => curr = actual,
            }
        }
    }

    async fn release(&self, _ctx: &Context) -> Result<(), Error> {
        // over-release saturates at zero
        let mut curr = self.running.load(Ordering::Acquire);
        loop {
            if curr == 0 {
                return Ok(());
            }
            match self
                .running
                .compare_exchange(curr, curr - 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Ok(()),
                Err(actual) => curr = actual,
            }
        }
    }
}
