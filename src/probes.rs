//! Read-only probes consulted by resource-aware throttlers.
//!
//! The crate never samples the system itself; it only consumes snapshots
//! through these narrow interfaces. Providers are called synchronously from
//! inside `acquire`, so a slow provider degrades acquire latency directly.

use crate::error::BoxError;

/// A point-in-time snapshot of process resource usage.
///
/// The same shape doubles as a threshold, where zero fields mean "no limit
/// on this field".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// Bytes of allocated heap memory.
    pub mem_alloc: u64,
    /// Bytes of memory obtained from the system.
    pub mem_system: u64,
    /// Cumulative collector pause, in nanoseconds.
    pub cpu_pause: u64,
    /// CPU usage as a fraction in `[0, 1]`.
    pub cpu_usage: f64,
}

/// Source of [Stats] snapshots for a [Monitor](crate::throttlers::Monitor)
/// throttler.
pub trait StatsProvider: Send + Sync {
    fn stats(&self) -> Result<Stats, BoxError>;
}

/// Source of a boolean gating signal for a
/// [Metric](crate::throttlers::Metric) throttler.
pub trait MetricProvider: Send + Sync {
    fn metric(&self) -> Result<bool, BoxError>;
}
