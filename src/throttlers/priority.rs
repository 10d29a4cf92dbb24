use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// A permit pool partitioned across priority classes.
///
/// Class `k` of `levels` owns `ceil(threshold * k / levels)` permits, so
/// higher classes see strictly larger quotas and wait less under
/// contention; the top class always spans the whole pool. Zero levels
/// means no partitioning, a single class over the full pool, equivalent
/// to [Buffered](crate::throttlers::Buffered).
///
/// Acquire reads the context priority (defaulting to 1 and clamped into
/// `1..=levels`), waits FIFO within its class, and release must present
/// the same priority to return the permit where it was taken.
pub struct Priority {
    classes: Vec<Class>,
}

struct Class {
    permits: Semaphore,
    taken: AtomicU64,
}

impl Priority {
    pub fn new(threshold: usize, levels: u8) -> Self {
        assert!(threshold > 0);

        let levels = usize::from(levels.max(1));
        let classes = (1..=levels)
            .map(|class| Class {
                permits: Semaphore::new((threshold * class).div_ceil(levels)),
                taken: AtomicU64::new(0),
            })
            .collect();
        Self { classes }
    }

    fn class(&self, ctx: &Context) -> &Class {
        let class = usize::from(ctx.priority()).min(self.classes.len());
        &self.classes[class - 1]
    }
}

#[async_trait]
impl Throttler for Priority {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        let class = self.class(ctx);
        let permit = ctx.suspend(class.permits.acquire()).await?;
        permit.expect("the semaphore is never closed").forget();
        class.taken.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn release(&self, ctx: &Context) -> Result<(), Error> {
        let class = self.class(ctx);
        let mut curr = class.taken.load(Ordering::Acquire);
        loop {
            if curr == 0 {
                return Ok(());
            }
            match class
                .taken
                .compare_exchange(curr, curr - 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    class.permits.add_permits(1);
                    return Ok(());
                }
                Err(actual) => curr = actual,
            }
        }
    }
}
