//! Composable admission-control throttlers for asynchronous workloads.
//!
//! Every throttler implements the same two-phase [Throttler] contract:
//! [acquire](Throttler::acquire) decides whether a unit of work may proceed
//! right now, must wait, or must be rejected, and a matching
//! [release](Throttler::release) tells the policy the work is done. Call
//! sites can wrap arbitrary work in a rate gate, concurrency cap, backoff,
//! latency gate or resource-pressure check without knowing which policy is
//! active.

mod context;
mod error;
pub mod probes;
pub mod throttlers;

pub use context::Context;
pub use error::{BoxError, Error};
pub use probes::{MetricProvider, Stats, StatsProvider};
pub use throttlers::Throttler;
