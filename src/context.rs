use std::future::Future;
use std::time::SystemTime;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Opaque carrier of per-call metadata.
///
/// A context travels with one unit of work through `acquire` and `release`.
/// All fields are optional; an empty context means "priority 1, entered the
/// system now, wait forever".
#[derive(Debug, Clone, Default)]
pub struct Context {
    priority: Option<u8>,
    timestamp: Option<SystemTime>,
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags the call with a priority class, `1` being the lowest.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Records when this request entered the system.
    ///
    /// Latency-gating throttlers measure against this instant; without it
    /// they fall back to the moment of acquire.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Bounds any suspension to the given deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attaches a cancellation token honored at every suspension point.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The priority class of the call, at least `1`.
    pub fn priority(&self) -> u8 {
        self.priority.unwrap_or(1).max(1)
    }

    /// The caller's entry instant, defaulting to now.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp.unwrap_or_else(SystemTime::now)
    }

    /// Drives a suspending operation, returning early when the context is
    /// canceled or its deadline passes.
    ///
    /// Cancellation takes precedence over the operation making progress.
    pub async fn suspend<T>(&self, op: impl Future<Output = T>) -> Result<T, Error> {
        tokio::pin!(op);
        let canceled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = canceled => Err(Error::Canceled),
            _ = expired => Err(Error::DeadlineExceeded),
            out = &mut op => Ok(out),
        }
    }
}
