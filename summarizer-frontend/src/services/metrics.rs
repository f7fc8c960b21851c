use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static SUMMARIZE_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static SUMMARIZE_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

/// Register all collectors. Later calls are no-ops.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )?;
    let request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        ),
        &["method", "path", "status"],
    )?;
    let summarize_total = IntCounterVec::new(
        Opts::new(
            "summarize_requests_total",
            "Uploads forwarded to the summarization backend",
        ),
        &["outcome"],
    )?;
    let summarize_duration = HistogramVec::new(
        HistogramOpts::new(
            "summarize_duration_seconds",
            "Round-trip time of summarization backend calls",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0, 160.0]),
        &["outcome"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(summarize_total.clone()))?;
    registry.register(Box::new(summarize_duration.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = HTTP_REQUESTS_TOTAL.set(requests_total);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = SUMMARIZE_REQUESTS_TOTAL.set(summarize_total);
    let _ = SUMMARIZE_DURATION_SECONDS.set(summarize_duration);

    Ok(())
}

pub fn record_http_request(method: &str, path: &str, status: &str, seconds: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, status])
            .observe(seconds);
    }
}

/// `outcome` is `success` or a `SummarizeError::kind`.
pub fn record_summarize(outcome: &str, seconds: f64) {
    if let Some(counter) = SUMMARIZE_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
    if let Some(histogram) = SUMMARIZE_DURATION_SECONDS.get() {
        histogram.with_label_values(&[outcome]).observe(seconds);
    }
}

/// Text exposition of the registry; empty before `init_metrics`.
pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
