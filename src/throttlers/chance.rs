use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Rejects a random fraction of acquires.
///
/// Stateless: every acquire draws independently from the thread-local
/// generator. A threshold at or below zero never rejects, at or above one
/// always does.
pub struct Chance {
    threshold: f64,
}

impl Chance {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl Throttler for Chance {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        if rand::random::<f64>() < self.threshold {
            return Err(Error::Chance);
        }
        Ok(())
    }
}
