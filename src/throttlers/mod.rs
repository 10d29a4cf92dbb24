//! The acquire/release contract and the policies implementing it.
//!
//! Policies are leaves: each encapsulates exactly one admission rule and
//! owns its state exclusively. Composition is layered above this crate.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Error;

mod backoff;
mod buffered;
mod chance;
mod counting;
mod echo;
mod latency;
mod metric;
mod monitor;
mod panic;
mod priority;
mod running;
mod timed;
mod wait;

pub use backoff::Backoff;
pub use buffered::Buffered;
pub use chance::Chance;
pub use counting::{After, Before, Each};
pub use echo::Echo;
pub use latency::{Latency, Percentile};
pub use metric::Metric;
pub use monitor::Monitor;
pub use panic::Panic;
pub use priority::Priority;
pub use running::Running;
pub use timed::Timed;
pub use wait::Wait;

/// An admission-control primitive wrapping a unit of work.
///
/// Acquire decides whether the caller may proceed; every successful acquire
/// must be matched by exactly one release once the work is done. Policies
/// that do not track outstanding work treat release as a no-op, and the
/// ones that do tolerate over-release by saturating at zero.
///
/// Only [Wait], [Backoff], [Buffered] and [Priority] may suspend the
/// caller, and each of them honors the context's cancellation token and
/// deadline while suspended. Everything else decides without blocking
/// beyond a short critical section.
#[async_trait]
pub trait Throttler: Send + Sync {
    /// Consults and mutates the policy state.
    ///
    /// A rejection is an ordinary typed value; the policy never retries on
    /// the caller's behalf.
    async fn acquire(&self, ctx: &Context) -> Result<(), Error>;

    /// Tells the policy the caller has finished its work.
    async fn release(&self, _ctx: &Context) -> Result<(), Error> {
        Ok(())
    }
}
