use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;
use crate::throttlers::Throttler;

/// Rejects every acquire with the panic sentinel.
///
/// Externally this is an ordinary typed failure, not an unwinding panic;
/// callers that want a crash can still escalate on [Error::Panic].
#[derive(Default)]
pub struct Panic;

impl Panic {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Throttler for Panic {
    async fn acquire(&self, _ctx: &Context) -> Result<(), Error> {
        Err(Error::Panic)
    }
}
