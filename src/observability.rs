use std::net::SocketAddr;

use crate::model::Cadence;

// ── Precheck path metrics ───────────────────────────────────────

/// Counter: precheck round trips. Labels: status (ok, stale, timeout, error), cadence.
pub const PRECHECKS_TOTAL: &str = "deskbook_prechecks_total";

/// Histogram: precheck round-trip latency in seconds.
pub const PRECHECK_DURATION_SECONDS: &str = "deskbook_precheck_duration_seconds";

/// Histogram: occurrences per precheck batch.
pub const PRECHECK_OCCURRENCES: &str = "deskbook_precheck_occurrences";

// ── Expansion metrics ───────────────────────────────────────────

/// Counter: recurrence expansions cut short by a safety bound.
pub const EXPANSIONS_TRUNCATED_TOTAL: &str = "deskbook_expansions_truncated_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Route engine logs to stderr. Convenience for hosts that don't install
/// their own subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}

/// Map a cadence to a short label for metrics.
pub fn cadence_label(cadence: Cadence) -> &'static str {
    match cadence {
        Cadence::None => "none",
        Cadence::Daily => "daily",
        Cadence::Weekly => "weekly",
    }
}
