use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Error envelope Metrics
    pub static ref DOMAIN_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "domain_errors_total",
        "Total error envelopes returned to callers",
        &["code"]
    )
    .unwrap();

    // Inter-service Metrics
    pub static ref REMOTE_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "remote_calls_total",
        "Total outbound calls to other services",
        &["service", "operation"]
    )
    .unwrap();

    pub static ref REMOTE_CALL_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "remote_call_errors_total",
        "Total outbound calls that ended in an error envelope",
        &["service", "code"]
    )
    .unwrap();

    pub static ref CIRCUIT_BREAKER_STATE: IntGaugeVec = register_int_gauge_vec!(
        "circuit_breaker_state",
        "Circuit breaker state (0 closed, 1 open, 2 half-open)",
        &["name"]
    )
    .unwrap();
}

/// Initialize all metrics (called on startup)
pub fn init_metrics() {
    // Force lazy_static initialization
    lazy_static::initialize(&HTTP_REQUESTS_TOTAL);
    lazy_static::initialize(&HTTP_REQUEST_DURATION_SECONDS);
    lazy_static::initialize(&DOMAIN_ERRORS_TOTAL);
    lazy_static::initialize(&REMOTE_CALLS_TOTAL);
    lazy_static::initialize(&REMOTE_CALL_ERRORS_TOTAL);
    lazy_static::initialize(&CIRCUIT_BREAKER_STATE);
}
