use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// A blocking permit pool: acquire waits for a free permit instead of
/// rejecting.
///
/// Permits are granted in FIFO order. Release returns a permit only while
/// one is genuinely outstanding, so a double release on an error path
/// cannot grow the pool past its configured size.
pub struct Buffered {
    permits: Semaphore,
    taken: AtomicU64,
}

impl Buffered {
    pub fn new(threshold: usize) -> Self {
        assert!(threshold > 0);

        Self {
            permits: Semaphore::new(threshold),
            taken: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Throttler for Buffered {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        let permit = ctx.suspend(self.permits.acquire()).await?;
        permit.expect("the semaphore is never closed").forget();
        self.taken.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn release(&self, _ctx: &Context) -> Result<(), Error> {
        let mut curr = self.taken.load(Ordering::Acquire);
        loop {
            if curr == 0 {
                return Ok(());
            }
            match self
                .taken
                .compare_exchange(curr, curr - 1, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    self.permits.add_permits(1);
                    return Ok(());
                }
                Err(actual) => curr = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::time::{timeout, Instant};
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[tokio::test]
    async fn later_acquires_wait_for_a_permit() {
        let thr = Arc::new(Buffered::new(1));
        let work = Duration::from_millis(25);

        let start = Instant::now();
        let jobs: Vec<_> = (0..3)
            .map(|_| {
                let thr = Arc::clone(&thr);
                tokio::spawn(async move {
                    let ctx = Context::new();
                    thr.acquire(&ctx).await.unwrap();
                    tokio::time::sleep(work).await;
                    thr.release(&ctx).await.unwrap();
                })
            })
            .collect();
        for job in jobs {
            job.await.unwrap();
        }

        // three jobs through a single permit serialize the work
        assert!(start.elapsed() >= work * 3);
    }

    #[tokio::test]
    async fn a_held_permit_blocks_the_next_acquire() {
        let thr = Buffered::new(1);
        let ctx = Context::new();

        thr.acquire(&ctx).await.unwrap();
        assert!(timeout(Duration::from_millis(20), thr.acquire(&ctx))
            .await
            .is_err());

        thr.release(&ctx).await.unwrap();
        assert!(thr.acquire(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn over_release_cannot_grow_the_pool() {
        let thr = Buffered::new(1);
        let ctx = Context::new();

        thr.acquire(&ctx).await.unwrap();
        for _ in 0..3 {
            thr.release(&ctx).await.unwrap();
        }

        thr.acquire(&ctx).await.unwrap();
        assert!(timeout(Duration::from_millis(20), thr.acquire(&ctx))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_blocked_acquire() {
        let thr = Buffered::new(1);
        let held = Context::new();
        thr.acquire(&held).await.unwrap();

        let token = CancellationToken::new();
        let ctx = Context::new().with_cancellation(token.clone());
        token.cancel();

        let err = thr.acquire(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Canceled));

        // the interrupted acquire must not have consumed the permit
        thr.release(&held).await.unwrap();
        assert!(thr.acquire(&held).await.is_ok());
    }

    #[tokio::test]
    async fn deadline_interrupts_a_blocked_acquire() {
        let thr = Buffered::new(1);
        let held = Context::new();
        thr.acquire(&held).await.unwrap();

        let ctx = Context::new().with_deadline(Instant::now() + Duration::from_millis(10));
        let err = thr.acquire(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded));
    }
}
