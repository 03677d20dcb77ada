//! Observability subsystem.
//!
//! Structured logging is initialized per binary with
//! `tracing-subscriber`; span export lives in [`crate::telemetry`].
//! This module carries the metrics side: cheap per-request counters
//! and a Prometheus scrape endpoint.

pub mod metrics;
