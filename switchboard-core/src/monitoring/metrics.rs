//! Request metrics and the bounded in-memory monitor
//!
//! The monitor keeps the most recent [`DEFAULT_CAPACITY`] records and
//! aggregates them on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Metrics retained before the oldest are evicted
pub const DEFAULT_CAPACITY: usize = 1000;

/// Latency above which a request is logged as slow
pub const SLOW_REQUEST_MS: f64 = 5000.0;

/// One completed or failed generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMetric {
    pub provider: String,
    pub model: String,
    pub latency_ms: f64,
    pub tokens_used: Option<u64>,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RequestMetric {
    pub fn success(
        provider: impl Into<String>,
        model: impl Into<String>,
        latency_ms: f64,
        tokens_used: Option<u64>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            latency_ms,
            tokens_used,
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(
        provider: impl Into<String>,
        model: impl Into<String>,
        latency_ms: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            latency_ms,
            tokens_used: None,
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Aggregates over a window of metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_requests: usize,
    /// Rounded to one decimal place
    pub success_rate_percent: f64,
    pub average_latency_ms: f64,
    pub min_latency_ms: f64,
    pub max_latency_ms: f64,
    pub total_failures: usize,
}

/// Result of [`PerformanceMonitor::get_stats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stats {
    Summary(StatsSummary),
    NoData { message: String },
}

impl Stats {
    fn no_data() -> Self {
        Stats::NoData {
            message: "No requests recorded".to_string(),
        }
    }

    pub fn summary(&self) -> Option<&StatsSummary> {
        match self {
            Stats::Summary(summary) => Some(summary),
            Stats::NoData { .. } => None,
        }
    }
}

/// Bounded, thread-safe store of recent request metrics
#[derive(Debug)]
pub struct PerformanceMonitor {
    capacity: usize,
    metrics: Mutex<VecDeque<RequestMetric>>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A monitor keeping at most `capacity` metrics (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            metrics: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // A panic while holding the lock cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<RequestMetric>> {
        self.metrics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, metric: RequestMetric) {
        if metric.latency_ms > SLOW_REQUEST_MS {
            warn!(
                "Slow request detected: {} took {:.2}ms",
                metric.provider, metric.latency_ms
            );
        }

        let mut metrics = self.lock();
        metrics.push_back(metric);
        while metrics.len() > self.capacity {
            metrics.pop_front();
        }
    }

    /// Aggregate statistics, optionally restricted to one provider.
    ///
    /// The provider filter compares case-insensitively, so `"groq"` matches
    /// metrics tagged `"Groq"`.
    pub fn get_stats(&self, provider: Option<&str>) -> Stats {
        let metrics = self.lock();
        let window: Vec<&RequestMetric> = metrics
            .iter()
            .filter(|m| provider.is_none_or(|p| m.provider.eq_ignore_ascii_case(p)))
            .collect();

        if window.is_empty() {
            return Stats::no_data();
        }

        let total = window.len();
        let successes = window.iter().filter(|m| m.success).count();
        let latencies = window.iter().map(|m| m.latency_ms);
        let sum: f64 = latencies.clone().sum();
        let min = latencies.clone().fold(f64::INFINITY, f64::min);
        let max = latencies.fold(f64::NEG_INFINITY, f64::max);

        let rate = successes as f64 / total as f64 * 100.0;

        Stats::Summary(StatsSummary {
            total_requests: total,
            success_rate_percent: (rate * 10.0).round() / 10.0,
            average_latency_ms: sum / total as f64,
            min_latency_ms: min,
            max_latency_ms: max,
            total_failures: total - successes,
        })
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the retained metrics, oldest first
    pub fn snapshot(&self) -> Vec<RequestMetric> {
        self.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_monitor_has_no_data() {
        let monitor = PerformanceMonitor::new();
        let stats = monitor.get_stats(None);
        assert_eq!(
            stats,
            Stats::NoData {
                message: "No requests recorded".to_string()
            }
        );
        assert!(stats.summary().is_none());
    }

    #[test]
    fn test_stats_aggregation() {
        let monitor = PerformanceMonitor::new();
        monitor.record(RequestMetric::success("OpenAI", "gpt", 100.0, Some(10)));
        monitor.record(RequestMetric::success("OpenAI", "gpt", 300.0, None));
        monitor.record(RequestMetric::failure("OpenAI", "gpt", 200.0, "boom"));

        let stats = monitor.get_stats(None);
        let summary = stats.summary().unwrap();
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.success_rate_percent, 66.7);
        assert_eq!(summary.average_latency_ms, 200.0);
        assert_eq!(summary.min_latency_ms, 100.0);
        assert_eq!(summary.max_latency_ms, 300.0);
        assert_eq!(summary.total_failures, 1);
    }

    #[test]
    fn test_filter_with_no_matches_has_no_data() {
        let monitor = PerformanceMonitor::new();
        monitor.record(RequestMetric::success("OpenAI", "gpt", 1.0, None));
        assert!(monitor.get_stats(Some("watsonx")).summary().is_none());
    }

    #[test]
    fn test_capacity_is_enforced() {
        let monitor = PerformanceMonitor::with_capacity(2);
        for i in 0..5 {
            monitor.record(RequestMetric::success("Groq", format!("m{i}"), 1.0, None));
        }
        let models: Vec<String> = monitor.snapshot().into_iter().map(|m| m.model).collect();
        assert_eq!(models, vec!["m3", "m4"]);
    }

    #[test]
    fn test_stats_serialize_untagged() {
        let monitor = PerformanceMonitor::new();
        let json = serde_json::to_value(monitor.get_stats(None)).unwrap();
        assert_eq!(json, serde_json::json!({"message": "No requests recorded"}));

        monitor.record(RequestMetric::success("Groq", "llama", 10.0, None));
        let json = serde_json::to_value(monitor.get_stats(None)).unwrap();
        assert_eq!(json["total_requests"], 1);
        assert_eq!(json["success_rate_percent"], 100.0);
    }

    #[test]
    fn test_clear() {
        let monitor = PerformanceMonitor::new();
        monitor.record(RequestMetric::success("Groq", "llama", 10.0, None));
        assert_eq!(monitor.len(), 1);
        monitor.clear();
        assert!(monitor.is_empty());
    }
}
