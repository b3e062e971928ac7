//! Scoped timing of provider calls

use super::metrics::{PerformanceMonitor, RequestMetric};
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

/// Records one metric for the call it times.
///
/// Finish the guard with the call's result. A guard dropped unfinished (the
/// timed future was cancelled) records a failure with error `"cancelled"`.
pub struct TimingGuard<'a> {
    monitor: &'a PerformanceMonitor,
    provider: String,
    model: String,
    start: Instant,
    finished: bool,
}

impl<'a> TimingGuard<'a> {
    pub fn start(
        monitor: &'a PerformanceMonitor,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            monitor,
            provider: provider.into(),
            model: model.into(),
            start: Instant::now(),
            finished: false,
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn finish<T, E: Display>(self, result: &Result<T, E>) {
        self.finish_with_tokens(result, None);
    }

    pub fn finish_with_tokens<T, E: Display>(
        mut self,
        result: &Result<T, E>,
        tokens_used: Option<u64>,
    ) {
        let latency_ms = self.elapsed_ms();
        let provider = std::mem::take(&mut self.provider);
        let model = std::mem::take(&mut self.model);

        let metric = match result {
            Ok(_) => RequestMetric::success(provider, model, latency_ms, tokens_used),
            Err(e) => RequestMetric::failure(provider, model, latency_ms, e.to_string()),
        };
        self.finished = true;
        self.monitor.record(metric);
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let metric = RequestMetric::failure(
                std::mem::take(&mut self.provider),
                std::mem::take(&mut self.model),
                self.elapsed_ms(),
                "cancelled",
            );
            self.monitor.record(metric);
        }
    }
}

impl PerformanceMonitor {
    /// Await `operation`, record its metric, and hand back its result unchanged
    pub async fn time<F, T, E>(
        &self,
        provider: impl Into<String>,
        model: impl Into<String>,
        operation: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let guard = TimingGuard::start(self, provider, model);
        let result = operation.await;
        guard.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_time_records_success_and_returns_value() {
        let monitor = PerformanceMonitor::new();
        let value: Result<u32, String> = monitor.time("OpenAI", "gpt", async { Ok(7) }).await;

        assert_eq!(value, Ok(7));
        let metrics = monitor.snapshot();
        assert_eq!(metrics.len(), 1);
        assert!(metrics[0].success);
        assert_eq!(metrics[0].provider, "OpenAI");
        assert!(metrics[0].latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_time_propagates_failure() {
        let monitor = PerformanceMonitor::new();
        let value: Result<u32, String> = monitor
            .time("Groq", "llama", async { Err("rate limited".to_string()) })
            .await;

        assert_eq!(value, Err("rate limited".to_string()));
        let metrics = monitor.snapshot();
        assert!(!metrics[0].success);
        assert_eq!(metrics[0].error.as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_finish_with_tokens() {
        let monitor = PerformanceMonitor::new();
        let guard = TimingGuard::start(&monitor, "WatsonX", "granite");
        guard.finish_with_tokens(&Ok::<_, String>(()), Some(42));
        assert_eq!(monitor.snapshot()[0].tokens_used, Some(42));
    }

    #[test]
    fn test_dropped_guard_records_cancellation() {
        let monitor = PerformanceMonitor::new();
        {
            let _guard = TimingGuard::start(&monitor, "WatsonX", "granite");
        }
        let metrics = monitor.snapshot();
        assert_eq!(metrics.len(), 1);
        assert!(!metrics[0].success);
        assert_eq!(metrics[0].error.as_deref(), Some("cancelled"));
        assert_eq!(metrics[0].model, "granite");
    }
}
