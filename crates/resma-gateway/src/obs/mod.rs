//! Lightweight in-process metrics.
//!
//! Counter registry with dynamic labels, rendered in Prometheus text format
//! by the `/metrics` handler. Deliberately small: no histogram machinery, the
//! gateway only counts bodies, bytes, and failures.

pub mod metrics;
