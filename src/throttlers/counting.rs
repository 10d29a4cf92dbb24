//! Call-counting policies: periodic, warm-up and cut-off rejection.
//!
//! All three advance their counter on every acquire, rejected or not; only
//! the decision rule differs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Rejects every nth acquire.
pub struct Each {
    threshold: u64,
    calls: AtomicU64,
}

impl Each {
    pub fn new(threshold: u64) -> Self {
        assert!(threshold > 0);

        Self {
            threshold,
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Throttler for Each {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let calls = self.calls.fetch_add(1, Ordering::AcqRel) + 1;
        if calls % self.threshold == 0 {
            return Err(Error::PeriodicThreshold);
        }
        Ok(())
    }
}

/// Rejects the first `threshold` acquires, then passes everything.
pub struct Before {
    threshold: u64,
    calls: AtomicU64,
}

impl Before {
    pub fn new(threshold: u64) -> Self {
        assert!(threshold > 0);

        Self {
            threshold,
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Throttler for Before {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let calls = self.calls.fetch_add(1, Ordering::AcqRel) + 1;
        if calls <= self.threshold {
            return Err(Error::BelowThreshold);
        }
        Ok(())
    }
}

/// Passes the first `threshold` acquires, then rejects everything.
pub struct After {
    threshold: u64,
    calls: AtomicU64,
}

impl After {
    pub fn new(threshold: u64) -> Self {
        assert!(threshold > 0);

        Self {
            threshold,
            calls: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Throttler for After {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let calls = self.calls.fetch_add(1, Ordering::AcqRel) + 1;
        if calls > self.threshold {
            return Err(Error::AboveThreshold);
        }
        Ok(())
    }
}
