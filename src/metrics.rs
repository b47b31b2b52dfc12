use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Metrics collection and management
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    // Scheduler metrics
    pub cycles_total: &'static str,
    pub cycle_duration: &'static str,
    pub users_notified_total: &'static str,

    // Pipeline metrics
    pub jobs_fetched_total: &'static str,
    pub jobs_delivered_total: &'static str,
    pub source_failures_total: &'static str,
    pub delivery_failures_total: &'static str,

    // Error metrics
    pub store_errors_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            cycles_total: "job_bot_cycles_total",
            cycle_duration: "job_bot_cycle_duration_seconds",
            users_notified_total: "job_bot_users_notified_total",

            jobs_fetched_total: "job_bot_jobs_fetched_total",
            jobs_delivered_total: "job_bot_jobs_delivered_total",
            source_failures_total: "job_bot_source_failures_total",
            delivery_failures_total: "job_bot_delivery_failures_total",

            store_errors_total: "job_bot_store_errors_total",
        }
    }
}

impl MetricsCollector {
    /// Record one completed scheduler cycle
    pub fn record_cycle(&self, users: usize, duration: Duration) {
        counter!(self.cycles_total).increment(1);
        histogram!(self.cycle_duration).record(duration.as_secs_f64());
        gauge!("job_bot_cycle_users").set(users as f64);
    }

    /// Record postings fetched from one source
    pub fn record_fetch(&self, source: &'static str, count: usize) {
        counter!(self.jobs_fetched_total, "source" => source).increment(count as u64);
    }

    /// Record a source that failed and was skipped
    pub fn record_source_failure(&self, source: &'static str) {
        counter!(self.source_failures_total, "source" => source).increment(1);
    }

    /// Record jobs delivered to one user
    pub fn record_delivery(&self, count: usize) {
        counter!(self.jobs_delivered_total).increment(count as u64);
        counter!(self.users_notified_total).increment(1);
    }

    /// Record a failed send
    pub fn record_delivery_failure(&self) {
        counter!(self.delivery_failures_total).increment(1);
    }

    /// Record a persistence-layer failure
    pub fn record_store_error(&self, operation: &'static str) {
        counter!(self.store_errors_total, "operation" => operation).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.cycles_total, "job_bot_cycles_total");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        // With no global recorder installed these must not panic
        let collector = MetricsCollector::default();
        collector.record_cycle(3, Duration::from_millis(10));
        collector.record_fetch("linkedin", 5);
        collector.record_delivery(2);
    }
}
