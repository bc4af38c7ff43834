use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, Encoder, HistogramVec,
    IntCounterVec, IntGauge, TextEncoder,
};

use crate::models::Modality;
use crate::store::StoreError;

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
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

    // Store Metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "store_operations_total",
        "Total number of session store operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "store_operation_duration_seconds",
        "Session store operation duration in seconds",
        &["operation"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1]
    )
    .unwrap();

    // Business Metrics
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sessions_total",
        "Total number of test sessions",
        &["status"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sessions_active",
        "Number of sessions created but not yet completed"
    )
    .unwrap();

    pub static ref RESPONSES_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "responses_submitted_total",
        "Total number of stimulus responses accepted",
        &["modality"]
    )
    .unwrap();

    pub static ref RESPONSES_REJECTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "responses_rejected_total",
        "Total number of stimulus responses rejected at validation",
        &["modality"]
    )
    .unwrap();

    pub static ref MODALITY_SCORE: HistogramVec = register_histogram_vec!(
        "modality_score",
        "Consistency score per modality at session completion",
        &["modality"],
        vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 85.0, 90.0, 100.0]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track session store operation with metrics
pub async fn track_store_operation<F, T>(operation: &str, future: F) -> Result<T, StoreError>
where
    F: std::future::Future<Output = Result<T, StoreError>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

pub fn record_response_submitted(modality: Modality) {
    RESPONSES_SUBMITTED_TOTAL
        .with_label_values(&[modality.as_str()])
        .inc();
}

pub fn record_response_rejected(modality: Modality) {
    RESPONSES_REJECTED_TOTAL
        .with_label_values(&[modality.as_str()])
        .inc();
}

pub fn record_modality_score(modality: Modality, score: u8) {
    MODALITY_SCORE
        .with_label_values(&[modality.as_str()])
        .observe(f64::from(score));
}
