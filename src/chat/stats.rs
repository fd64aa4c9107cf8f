//! Derived chat statistics
//!
//! A [`Stats`] snapshot is a pure projection of the message store and the
//! current session. The [`StatsAggregator`] keeps the latest snapshot and
//! uses it as the baseline for the next snapshot's trends.

use crate::chat::message::MessageStore;
use crate::chat::session::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default period between timer-driven recomputes
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(60);

/// Percentage change of each metric against the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub messages: i64,
    pub tokens: i64,
    pub response_time: i64,
}

/// Snapshot of session statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub messages_count: u64,
    pub tokens_used: u64,
    /// Seconds
    pub average_response_time: u64,
    /// Whole minutes since the session started
    pub session_duration: u64,
    pub trends: Trends,
}

/// Round half towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Percentage change from `previous` to `current`
///
/// Zero when there is no previous value to compare against.
///
/// # Examples
///
/// ```
/// use swarmchat::chat::stats::calculate_trend;
///
/// assert_eq!(calculate_trend(150, 100), 50);
/// assert_eq!(calculate_trend(50, 100), -50);
/// assert_eq!(calculate_trend(7, 0), 0);
/// ```
pub fn calculate_trend(current: u64, previous: u64) -> i64 {
    if previous == 0 {
        return 0;
    }
    let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
    round_half_up(change) as i64
}

/// Rounded mean of the response times, zero for an empty list
///
/// # Examples
///
/// ```
/// use swarmchat::chat::stats::average_response_time;
///
/// assert_eq!(average_response_time(&[]), 0);
/// assert_eq!(average_response_time(&[1, 2]), 2);
/// ```
pub fn average_response_time(response_times: &[u64]) -> u64 {
    if response_times.is_empty() {
        return 0;
    }
    let sum = response_times
        .iter()
        .fold(0u64, |acc, &t| acc.saturating_add(t));
    round_half_up(sum as f64 / response_times.len() as f64) as u64
}

/// Whole minutes between `start` and `now`, never negative
pub fn session_duration_minutes(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let elapsed_ms = (now - start).num_milliseconds().max(0) as u64;
    elapsed_ms / 60_000
}

impl Stats {
    /// Compute a snapshot, taking trend baselines from `previous`
    pub fn compute(
        messages: &MessageStore,
        session: &Session,
        previous: &Stats,
        now: DateTime<Utc>,
    ) -> Self {
        let messages_count = messages.conversational_count() as u64;
        let tokens_used = session.tokens_used;
        let average_response_time = average_response_time(&session.response_times);

        Self {
            messages_count,
            tokens_used,
            average_response_time,
            session_duration: session_duration_minutes(session.start_time, now),
            trends: Trends {
                messages: calculate_trend(messages_count, previous.messages_count),
                tokens: calculate_trend(tokens_used, previous.tokens_used),
                response_time: calculate_trend(
                    average_response_time,
                    previous.average_response_time,
                ),
            },
        }
    }
}

/// Holder of the latest statistics snapshot
///
/// Recomputed on a fixed interval and whenever the messages or session
/// change. Each recompute compares against the immediately preceding
/// snapshot.
#[derive(Debug, Clone)]
pub struct StatsAggregator {
    current: Stats,
    interval: Duration,
    refreshed_at: Option<DateTime<Utc>>,
}

impl StatsAggregator {
    pub fn new(interval: Duration) -> Self {
        Self {
            current: Stats::default(),
            interval,
            refreshed_at: None,
        }
    }

    /// Replace the snapshot with one computed at `now`
    pub fn recompute(
        &mut self,
        messages: &MessageStore,
        session: &Session,
        now: DateTime<Utc>,
    ) -> &Stats {
        self.current = Stats::compute(messages, session, &self.current, now);
        self.refreshed_at = Some(now);
        tracing::debug!(
            "Stats refreshed: messages={} tokens={} avg_response={}s duration={}m",
            self.current.messages_count,
            self.current.tokens_used,
            self.current.average_response_time,
            self.current.session_duration
        );
        &self.current
    }

    pub fn stats(&self) -> &Stats {
        &self.current
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_STATS_INTERVAL)
    }
}
