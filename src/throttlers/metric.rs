use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::probes::MetricProvider;
use crate::throttlers::Throttler;

/// Rejects while a boolean metric predicate holds.
///
/// The probe is consulted on every acquire; a probe failure is surfaced as
/// [Error::MetricUnavailable] rather than swallowed.
pub struct Metric<P> {
    provider: P,
}

impl<P: MetricProvider> Metric<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: MetricProvider> Throttler for Metric<P> {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        if self.provider.metric().map_err(Error::MetricUnavailable)? {
            return Err(Error::MetricThreshold);
        }
        Ok(())
    }
}
