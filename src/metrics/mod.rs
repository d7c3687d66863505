//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Analyze API metrics
    pub analyze_requests: CounterVec,
    pub request_duration: HistogramVec,

    // Upstream metrics
    pub vision_requests: CounterVec,
    pub notify_dispatches: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let analyze_requests = register_counter_vec_with_registry!(
            Opts::new("analyze_requests_total", "Total analyze requests"),
            &["status"],
            registry
        )?;

        let request_duration = register_histogram_vec_with_registry!(
            "request_duration_seconds",
            "Request duration in seconds",
            &["endpoint"],
            registry
        )?;

        let vision_requests = register_counter_vec_with_registry!(
            Opts::new("vision_requests_total", "Total vision classifier calls"),
            &["status"],
            registry
        )?;

        let notify_dispatches = register_counter_vec_with_registry!(
            Opts::new(
                "notify_dispatches_total",
                "Total notification dispatches by audience"
            ),
            &["audience", "status"],
            registry
        )?;

        Ok(Self {
            registry,
            analyze_requests,
            request_duration,
            vision_requests,
            notify_dispatches,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record an analyze request outcome
    pub fn record_analyze(&self, status: &str) {
        self.analyze_requests.with_label_values(&[status]).inc();
    }

    /// Record a vision classifier call
    pub fn record_vision(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.vision_requests.with_label_values(&[status]).inc();
    }

    /// Record a notification dispatch
    pub fn record_notify(&self, audience: &str, success: bool) {
        let status = if success { "success" } else { "error" };
        self.notify_dispatches
            .with_label_values(&[audience, status])
            .inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
