use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("thesis_requests_total", "Total number of generate requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("thesis_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "thesis_request_latency_seconds",
        "Generate request latency in seconds"
    )
    .unwrap();
    pub static ref PROVIDER_FAILURES: CounterVec = register_counter_vec!(
        "thesis_provider_failures_total",
        "Provider attempts that produced no text",
        &["provider"]
    )
    .unwrap();
    pub static ref GENERATIONS: CounterVec = register_counter_vec!(
        "thesis_generations_total",
        "Successful generations by tier",
        &["api_used"]
    )
    .unwrap();
}

// Text exposition of the default registry
pub fn gather() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
