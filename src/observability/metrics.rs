//! Metrics collection.
//!
//! # Metrics
//! - `user_feed_fetch_total` (counter): fetches by outcome (success, transport, decode)
//! - `user_feed_fetch_duration_seconds` (histogram): time from task start to result
//! - `user_feed_users` (gauge): size of the latest stored list
//! - `user_feed_subscribers` (gauge): current value subscribers
//!
//! Without an installed recorder every call here is a no-op.

use std::time::Instant;

pub const FETCH_TOTAL: &str = "user_feed_fetch_total";
pub const FETCH_DURATION: &str = "user_feed_fetch_duration_seconds";
pub const USERS: &str = "user_feed_users";
pub const SUBSCRIBERS: &str = "user_feed_subscribers";

/// Record a finished fetch.
pub fn record_fetch(outcome: &'static str, started: Instant) {
    metrics::counter!(FETCH_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(FETCH_DURATION, "outcome" => outcome).record(started.elapsed().as_secs_f64());
}

pub fn record_user_count(count: usize) {
    metrics::gauge!(USERS).set(count as f64);
}

pub fn record_subscribers(count: usize) {
    metrics::gauge!(SUBSCRIBERS).set(count as f64);
}
