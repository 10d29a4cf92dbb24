use std::error;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Echoes a configured error on every acquire, or passes everything.
///
/// The identity policy: a placeholder where a throttler is required, and a
/// way to force a known failure through call sites under test.
pub struct Echo {
    err: Option<Arc<dyn error::Error + Send + Sync>>,
}

impl Echo {
    pub fn new<E>(err: Option<E>) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self {
            err: err.map(|err| Arc::new(err) as Arc<dyn error::Error + Send + Sync>),
        }
    }
}

#[async_trait]
impl Throttler for Echo {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        match &self.err {
            Some(err) => Err(Error::Echoed(Arc::clone(err))),
            None => Ok(()),
        }
    }
}
