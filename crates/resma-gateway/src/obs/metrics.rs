//! Minimal metrics registry for the gateway.
//!
//! Counters are atomics keyed by sorted label vectors in a `DashMap`, which
//! keeps rendering deterministic without a metrics dependency.

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let mut key: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        key.sort();

        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Sum across all label sets.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let label_str = r
                .key()
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                .collect::<Vec<_>>()
                .join(",");
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    /// Bodies decoded, labeled by inbound format (json/msgpack/zstd).
    pub decoded_bodies: CounterVec,
    /// Decode rejections, labeled by client error code.
    pub decode_errors: CounterVec,
    /// Raw bytes buffered for the custom content-types.
    pub body_bytes_in: CounterVec,
    /// Accepted snapshot payloads.
    pub snapshots: CounterVec,
    draining: AtomicBool,
}

impl GatewayMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.decoded_bodies.render("resma_decoded_bodies_total", &mut out);
        self.decode_errors.render("resma_decode_errors_total", &mut out);
        self.body_bytes_in.render("resma_body_bytes_in_total", &mut out);
        self.snapshots.render("resma_snapshots_total", &mut out);
        let _ = writeln!(
            out,
            "# TYPE resma_draining gauge\nresma_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        out
    }
}
