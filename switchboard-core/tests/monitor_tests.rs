//! Tests for metric retention and aggregation

use proptest::prelude::*;
use switchboard_core::monitoring::{PerformanceMonitor, RequestMetric, Stats};

#[test]
fn test_ring_buffer_evicts_oldest() {
    let monitor = PerformanceMonitor::new();
    for i in 0..1001 {
        monitor.record(RequestMetric::success("OpenAI", format!("m{i}"), i as f64, None));
    }

    let metrics = monitor.snapshot();
    assert_eq!(metrics.len(), 1000);
    assert_eq!(metrics.first().unwrap().model, "m1");
    assert_eq!(metrics.last().unwrap().model, "m1000");
}

#[test]
fn test_empty_buffer_reports_no_data() {
    let monitor = PerformanceMonitor::new();
    assert!(matches!(monitor.get_stats(None), Stats::NoData { .. }));
}

#[test]
fn test_provider_filter() {
    let monitor = PerformanceMonitor::new();
    monitor.record(RequestMetric::success("groq", "llama", 100.0, Some(3)));
    monitor.record(RequestMetric::failure("groq", "llama", 300.0, "HTTP 500"));
    monitor.record(RequestMetric::success("openai", "gpt", 9000.0, None));

    let stats = monitor.get_stats(Some("groq"));
    let summary = stats.summary().unwrap();
    assert_eq!(summary.total_requests, 2);
    assert_eq!(summary.success_rate_percent, 50.0);
    assert_eq!(summary.average_latency_ms, 200.0);
    assert_eq!(summary.max_latency_ms, 300.0);
    assert_eq!(summary.total_failures, 1);

    let all = monitor.get_stats(None);
    assert_eq!(all.summary().unwrap().total_requests, 3);
}

#[test]
fn test_concurrent_records_respect_capacity() {
    let monitor = PerformanceMonitor::with_capacity(50);
    std::thread::scope(|scope| {
        for t in 0..8 {
            let monitor = &monitor;
            scope.spawn(move || {
                for i in 0..100 {
                    monitor.record(RequestMetric::success("Groq", format!("t{t}-{i}"), 1.0, None));
                }
            });
        }
    });
    assert_eq!(monitor.len(), 50);
}

proptest! {
    #[test]
    fn prop_stats_bounds(latencies in prop::collection::vec(0.0f64..10_000.0, 1..200)) {
        let monitor = PerformanceMonitor::new();
        for (i, latency) in latencies.iter().enumerate() {
            let metric = if i % 3 == 0 {
                RequestMetric::failure("OpenAI", "gpt", *latency, "err")
            } else {
                RequestMetric::success("OpenAI", "gpt", *latency, None)
            };
            monitor.record(metric);
        }

        let stats = monitor.get_stats(None);
        let summary = stats.summary().unwrap();
        prop_assert_eq!(summary.total_requests, latencies.len());
        prop_assert!(summary.min_latency_ms <= summary.average_latency_ms + 1e-9);
        prop_assert!(summary.average_latency_ms <= summary.max_latency_ms + 1e-9);
        prop_assert!((0.0..=100.0).contains(&summary.success_rate_percent));
    }
}
