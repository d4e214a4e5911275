//! Lightweight in-process metrics.
//!
//! Decision counters and latency are stored as atomics and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;
