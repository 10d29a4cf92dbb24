use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::probes::{Stats, StatsProvider};
use crate::throttlers::Throttler;

/// Rejects while a stats probe reports resource usage at a threshold.
///
/// The probe is consulted on every acquire; a probe failure is surfaced as
/// [Error::StatsUnavailable] rather than swallowed. Zero threshold fields
/// put no limit on that resource.
pub struct Monitor<P> {
    provider: P,
    threshold: Stats,
}

impl<P: StatsProvider> Monitor<P> {
    pub fn new(provider: P, threshold: Stats) -> Self {
        Self {
            provider,
            threshold,
        }
    }

    fn exceeded(&self, stats: Stats) -> bool {
        let limit = &self.threshold;
        (limit.mem_alloc > 0 && stats.mem_alloc >= limit.mem_alloc)
            || (limit.mem_system > 0 && stats.mem_system >= limit.mem_system)
            || (limit.cpu_pause > 0 && stats.cpu_pause >= limit.cpu_pause)
            || (limit.cpu_usage > 0.0 && stats.cpu_usage >= limit.cpu_usage)
    }
}

#[async_trait]
impl<P: StatsProvider> Throttler for Monitor<P> {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        let stats = self.provider.stats().map_err(Error::StatsUnavailable)?;
        if self.exceeded(stats) {
            return Err(Error::StatsThreshold);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use crate::error::BoxError;

    use super::*;

    struct Fixed(Stats);

    impl StatsProvider for Fixed {
        fn stats(&self) -> Result<Stats, BoxError> {
            Ok(self.0)
        }
    }

    struct Failing;

    impl StatsProvider for Failing {
        fn stats(&self) -> Result<Stats, BoxError> {
            Err(Box::new(io::Error::new(io::ErrorKind::Other, "test")))
        }
    }

    fn limit() -> Stats {
        Stats {
            mem_alloc: 1000,
            mem_system: 2000,
            cpu_pause: 500,
            cpu_usage: 0.3,
        }
    }

    #[tokio::test]
    async fn a_probe_failure_is_wrapped() {
        let thr = Monitor::new(Failing, Stats::default());
        let ctx = Context::new();

        for _ in 0..3 {
            let err = thr.acquire(&ctx).await.unwrap_err();
            assert_eq!(err.to_string(), "throttler hasn't found any stats: test");
        }
    }

    #[tokio::test]
    async fn usage_below_every_threshold_passes() {
        let current = Stats {
            mem_alloc: 100,
            mem_system: 1000,
            cpu_pause: 100,
            cpu_usage: 0.1,
        };
        let thr = Monitor::new(Fixed(current), limit());
        let ctx = Context::new();

        for _ in 0..3 {
            assert!(thr.acquire(&ctx).await.is_ok());
            assert!(thr.release(&ctx).await.is_ok());
        }
    }

    #[tokio::test]
    async fn any_threshold_breach_rejects() {
        // mem_system and cpu_pause are at or over their limits
        let current = Stats {
            mem_alloc: 500,
            mem_system: 5000,
            cpu_pause: 500,
            cpu_usage: 0.1,
        };
        let thr = Monitor::new(Fixed(current), limit());
        let ctx = Context::new();

        for _ in 0..3 {
            let err = thr.acquire(&ctx).await.unwrap_err();
            assert_eq!(err.to_string(), "throttler has exceed stats threshold");
        }
    }

    #[tokio::test]
    async fn zero_threshold_fields_are_unlimited() {
        let current = Stats {
            mem_alloc: u64::MAX,
            mem_system: u64::MAX,
            cpu_pause: u64::MAX,
            cpu_usage: 1.0,
        };
        let thr = Monitor::new(Fixed(current), Stats::default());
        assert!(thr.acquire(&Context::new()).await.is_ok());
    }
}
