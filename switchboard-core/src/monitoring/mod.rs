//! Request metrics and aggregate statistics
//!
//! A [`PerformanceMonitor`] is created by the process entry point and passed
//! to whoever issues provider calls.

mod metrics;
mod timing;

pub use metrics::{
    PerformanceMonitor, RequestMetric, Stats, StatsSummary, DEFAULT_CAPACITY, SLOW_REQUEST_MS,
};
pub use timing::TimingGuard;
