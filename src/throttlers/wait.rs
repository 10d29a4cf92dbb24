use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Sleeps for a fixed pause on every acquire, then passes.
///
/// A pacing primitive: it never rejects, it only delays.
pub struct Wait {
    pause: Duration,
}

impl Wait {
    pub fn new(pause: Duration) -> Self {
        Self { pause }
    }
}

#[async_trait]
impl Throttler for Wait {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        ctx.suspend(sleep(self.pause)).await
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[tokio::test]
    async fn pauses_every_acquire() {
        let thr = Wait::new(Duration::from_millis(10));
        let ctx = Context::new();

        for _ in 0..3 {
            let start = Instant::now();
            assert!(thr.acquire(&ctx).await.is_ok());
            assert!(start.elapsed() >= Duration::from_millis(9));
            assert!(thr.release(&ctx).await.is_ok());
        }
    }

    #[tokio::test]
    async fn cancellation_interrupts_the_pause() {
        let thr = Wait::new(Duration::from_secs(60));
        let token = CancellationToken::new();
        let ctx = Context::new().with_cancellation(token.clone());
        token.cancel();

        let err = thr.acquire(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::Canceled));
    }

    #[tokio::test]
    async fn deadline_interrupts_the_pause() {
        let thr = Wait::new(Duration::from_secs(60));
        let ctx = Context::new().with_deadline(Instant::now() + Duration::from_millis(10));

        let start = Instant::now();
        let err = thr.acquire(&ctx).await.unwrap_err();
        assert!(matches!(err, Error::DeadlineExceeded));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
