//! Latency gates: latch on the worst observed latency, or on a quantile
//! over a bounded sample of recent latencies.
//!
//! Latency is how late a request already is: the wall-clock distance from
//! the entry timestamp carried by its context to the moment of acquire.
//! Both gates reopen through a retention cool-down polled on acquire, so
//! no timer task is ever spawned.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

fn observed(ctx: &Context) -> Duration {
    SystemTime::now()
        .duration_since(ctx.timestamp())
        .unwrap_or(Duration::ZERO)
}

/// Gates on the worst latency seen so far.
///
/// Once any request is observed at the limit the gate closes for
/// `retention`, then the latch resets to zero and admissions resume.
/// Rejected acquires are not sampled.
pub struct Latency {
    limit: Duration,
    retention: Duration,
    latched: Mutex<Latched>,
}

struct Latched {
    observed: Duration,
    breached_at: Option<Instant>,
}

impl Latency {
    pub fn new(limit: Duration, retention: Duration) -> Self {
        Self {
            limit,
            retention,
            latched: Mutex::new(Latched {
                observed: Duration::ZERO,
                breached_at: None,
            }),
        }
    }
}

#[async_trait]
impl Throttler for Latency {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        let mut latched = self.latched.lock().unwrap();
        if let Some(breached_at) = latched.breached_at {
            if breached_at.elapsed() >= self.retention {
                latched.observed = Duration::ZERO;
                latched.breached_at = None;
            }
        }
        if latched.observed >= self.limit {
            return Err(Error::LatencyThreshold);
        }
        let observed = observed(ctx);
        if observed > latched.observed {
            latched.observed = observed;
            if observed >= self.limit {
                latched.breached_at = Some(Instant::now());
            }
        }
        Ok(())
    }
}

/// Gates on a quantile over a bounded sample of recent latencies.
///
/// The percentile is a fraction: values at or above one select the
/// maximum, at or below zero the minimum. An empty sample never rejects.
/// After a breach the sample is cleared `retention` later and the gate
/// reopens. Rejected acquires are not sampled.
pub struct Percentile {
    limit: Duration,
    percentile: f64,
    retention: Duration,
    sample: Mutex<Sample>,
}

struct Sample {
    latencies: VecDeque<Duration>,
    breached_at: Option<Instant>,
}

impl Percentile {
    /// Oldest entries are evicted past this many samples.
    const CAPACITY: usize = 128;

    pub fn new(limit: Duration, percentile: f64, retention: Duration) -> Self {
        Self {
            limit,
            percentile: percentile.clamp(0.0, 1.0),
            retention,
            sample: Mutex::new(Sample {
                latencies: VecDeque::with_capacity(Self::CAPACITY),
                breached_at: None,
            }),
        }
    }
}

impl Sample {
    fn quantile(&self, percentile: f64) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.latencies.iter().copied().collect();
        sorted.sort_unstable();
        let at = ((sorted.len() - 1) as f64 * percentile).round() as usize;
        sorted[at]
    }
}

#[async_trait]
impl Throttler for Percentile {
    async fn acquire(&self, ctx: &Context) -> Result<(), Error> {
        let mut sample = self.sample.lock().unwrap();
        if let Some(breached_at) = sample.breached_at {
            if breached_at.elapsed() >= self.retention {
                sample.latencies.clear();
                sample.breached_at = None;
            }
        }
        if sample.quantile(self.percentile) >= self.limit {
            if sample.breached_at.is_none() {
                sample.breached_at = Some(Instant::now());
            }
            return Err(Error::LatencyThreshold);
        }
        if sample.latencies.len() == Self::CAPACITY {
            sample.latencies.pop_front();
        }
        sample.latencies.push_back(observed(ctx));
        Ok(())
    }
}
