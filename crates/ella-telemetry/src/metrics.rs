//! Prometheus metrics for the configuration service.
//!
//! All metrics follow the naming convention: `ella_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

const DURATION_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // OPERATOR IDENTITY
    // =========================================================================

    /// Mutation attempts by sub-resource and outcome
    pub static ref OPERATOR_MUTATIONS: CounterVec = CounterVec::new(
        Opts::new("ella_operator_mutations_total", "Operator configuration mutation attempts"),
        &["resource", "outcome"]  // outcome: accepted/rejected/conflict/failed
    ).expect("metric creation failed");

    /// Time from admission to acknowledgement
    pub static ref OPERATOR_MUTATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ella_operator_mutation_duration_seconds",
            "Time spent applying an operator mutation"
        ).buckets(DURATION_BUCKETS.to_vec()),
        &["resource"]
    ).expect("metric creation failed");

    /// Radios currently attached
    pub static ref RADIOS_ATTACHED: IntGauge = IntGauge::new(
        "ella_radios_attached",
        "Number of radios currently attached"
    ).expect("metric creation failed");

    // =========================================================================
    // CHANGE LOG
    // =========================================================================

    /// Audit entries durably written
    pub static ref AUDIT_ENTRIES_WRITTEN: Counter = Counter::new(
        "ella_audit_entries_written_total",
        "Total audit entries durably written"
    ).expect("metric creation failed");

    /// Audit entries removed by retention
    pub static ref AUDIT_ENTRIES_REAPED: Counter = Counter::new(
        "ella_audit_entries_reaped_total",
        "Total audit entries removed by the retention reaper"
    ).expect("metric creation failed");

    // =========================================================================
    // HTTP
    // =========================================================================

    /// Requests by method, route and status class
    pub static ref HTTP_REQUESTS: CounterVec = CounterVec::new(
        Opts::new("ella_http_requests_total", "HTTP requests served"),
        &["method", "route", "status"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; collectors already registered are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OPERATOR_MUTATIONS.clone()),
        Box::new(OPERATOR_MUTATION_DURATION.clone()),
        Box::new(RADIOS_ATTACHED.clone()),
        Box::new(AUDIT_ENTRIES_WRITTEN.clone()),
        Box::new(AUDIT_ENTRIES_REAPED.clone()),
        Box::new(HTTP_REQUESTS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Render the registry in the Prometheus text exposition format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
