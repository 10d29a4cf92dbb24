use std::error;
use std::fmt;
use std::sync::Arc;

/// Boxed error produced by an external probe.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

/// Why an acquire did not pass.
///
/// Rejections are ordinary values, never exceptional control flow: the
/// caller decides whether to shed, retry or propagate. Wrapped causes stay
/// reachable through [source](error::Error::source).
#[derive(Debug)]
pub enum Error {
    /// A caller-configured error echoed back verbatim.
    Echoed(Arc<dyn error::Error + Send + Sync>),
    /// Sentinel rejection of the [Panic](crate::throttlers::Panic) policy.
    Panic,
    /// The "every nth call" rejection fired.
    PeriodicThreshold,
    /// The call count has not passed the configured threshold yet.
    BelowThreshold,
    /// The call count has passed the configured threshold.
    AboveThreshold,
    /// The probabilistic rejection fired.
    Chance,
    /// In-flight calls have reached the running limit.
    RunningThreshold,
    /// The window budget is exhausted.
    TimedThreshold,
    /// The stats probe failed.
    StatsUnavailable(BoxError),
    /// A resource threshold has been exceeded.
    StatsThreshold,
    /// The metric probe failed.
    MetricUnavailable(BoxError),
    /// The metric predicate came back true.
    MetricThreshold,
    /// Observed request latency has reached the limit.
    LatencyThreshold,
    /// The request context was canceled while waiting.
    Canceled,
    /// The request context deadline passed while waiting.
    DeadlineExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Echoed(err) => write!(f, "{err}"),
            Error::Panic => write!(f, "throttler has reached panic"),
            Error::PeriodicThreshold => write!(f, "throttler has reached periodic threshold"),
            Error::BelowThreshold => write!(f, "throttler has not reached threshold yet"),
            Error::AboveThreshold | Error::TimedThreshold => {
                write!(f, "throttler has exceed threshold")
            }
            Error::Chance => write!(f, "throttler has reached chance threshold"),
            Error::RunningThreshold => write!(f, "throttler has exceed running threshold"),
            Error::StatsUnavailable(err) => {
                write!(f, "throttler hasn't found any stats: {err}")
            }
            Error::StatsThreshold => write!(f, "throttler has exceed stats threshold"),
            Error::MetricUnavailable(err) => {
                write!(f, "throttler hasn't found any metric: {err}")
            }
            Error::MetricThreshold => write!(f, "throttler has reached metric threshold"),
            Error::LatencyThreshold => write!(f, "throttler has exceed latency threshold"),
            Error::Canceled => write!(f, "context has been canceled"),
            Error::DeadlineExceeded => write!(f, "context deadline has been exceeded"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Echoed(err) => Some(&**err),
            Error::StatsUnavailable(err) | Error::MetricUnavailable(err) => Some(&**err),
            _ => None,
        }
    }
}
