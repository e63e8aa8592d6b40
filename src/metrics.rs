use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("blog_requests_total", "Total number of API requests").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("blog_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref VIEWS_NEW: Counter =
        register_counter!("blog_views_new_total", "Post views counted as new").unwrap();
    pub static ref VIEWS_DUPLICATE: Counter =
        register_counter!("blog_views_duplicate_total", "Post views already seen today").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "blog_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_ENTRIES: Gauge =
        register_gauge!("blog_rate_limit_entries", "Clients with an open rate limit window").unwrap();
    pub static ref TRACKED_POSTS: Gauge =
        register_gauge!("blog_tracked_posts", "Posts with at least one tracked view").unwrap();
}

// Prometheus text exposition of the default registry
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
