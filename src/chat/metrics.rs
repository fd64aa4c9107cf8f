//! Request metrics for chat sends
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding application installs a recorder.
//!
//! - `chat_requests_total`: counter of chat requests issued
//! - `chat_requests_in_flight`: gauge of requests awaiting a reply
//! - `chat_response_time_seconds`: histogram of reply latency
//! - `chat_tokens_used_total`: counter of tokens reported by the server
//! - `chat_request_failures_total`: counter of failed requests by outcome

use metrics::{counter, decrement_gauge, histogram, increment_counter, increment_gauge};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Timing and outcome of a single chat request
///
/// Created when the request is issued. The latency it reports is also
/// what the session records as the response time.
///
/// # Examples
///
/// ```
/// use swarmchat::chat::metrics::RequestMetrics;
///
/// let metrics = RequestMetrics::start();
/// metrics.record_success(42);
/// assert_eq!(metrics.response_time_secs(), 0);
/// ```
#[derive(Debug)]
pub struct RequestMetrics {
    start: Instant,
    recorded: Cell<bool>,
}

impl RequestMetrics {
    pub fn start() -> Self {
        increment_counter!("chat_requests_total");
        increment_gauge!("chat_requests_in_flight", 1.0);
        Self {
            start: Instant::now(),
            recorded: Cell::new(false),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed wall-clock time rounded to whole seconds
    pub fn response_time_secs(&self) -> u64 {
        (self.elapsed().as_millis() as f64 / 1000.0).round() as u64
    }

    pub fn record_success(&self, tokens: u64) {
        if self.recorded.replace(true) {
            return;
        }
        histogram!(
            "chat_response_time_seconds",
            self.elapsed().as_secs_f64()
        );
        counter!("chat_tokens_used_total", tokens);
        decrement_gauge!("chat_requests_in_flight", 1.0);
    }

    /// `outcome` is a short label such as "network" or "cancelled"
    pub fn record_failure(&self, outcome: &str) {
        if self.recorded.replace(true) {
            return;
        }
        increment_counter!("chat_request_failures_total", "outcome" => outcome.to_string());
        decrement_gauge!("chat_requests_in_flight", 1.0);
    }
}

impl Drop for RequestMetrics {
    fn drop(&mut self) {
        if !self.recorded.get() {
            decrement_gauge!("chat_requests_in_flight", 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_starts_near_zero() {
        let metrics = RequestMetrics::start();
        assert!(metrics.elapsed().as_millis() < 100);
        assert_eq!(metrics.response_time_secs(), 0);
    }

    #[test]
    fn test_record_only_once() {
        let metrics = RequestMetrics::start();
        metrics.record_success(10);
        assert!(metrics.recorded.get());
        metrics.record_failure("network");
        assert!(metrics.recorded.get());
    }

    #[test]
    fn test_failure_marks_recorded() {
        let metrics = RequestMetrics::start();
        metrics.record_failure("cancelled");
        assert!(metrics.recorded.get());
    }
}
