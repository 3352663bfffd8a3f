use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "biznest_client_request_duration_seconds",
        "BizNest API request duration in seconds",
        &["method"]
    ).unwrap();

    pub static ref REQUEST_COUNTER: IntCounterVec = register_int_counter_vec!(
        "biznest_client_requests_total",
        "Total number of BizNest API requests",
        &["method", "status"]
    ).unwrap();
}

/// Status label buckets: 2xx, 4xx, 5xx, or "error" when no response arrived
pub fn status_class(status: Option<u16>) -> &'static str {
    match status {
        Some(200..=299) => "2xx",
        Some(300..=399) => "3xx",
        Some(400..=499) => "4xx",
        Some(_) => "5xx",
        None => "error",
    }
}

pub fn record_request(method: &str, status: Option<u16>, duration: f64) {
    REQUEST_DURATION
        .with_label_values(&[method])
        .observe(duration);
    REQUEST_COUNTER
        .with_label_values(&[method, status_class(status)])
        .inc();
}

/// Totals across all methods: (requests, failed requests)
pub fn request_totals() -> (u64, u64) {
    let mut total = 0;
    let mut failed = 0;
    for family in prometheus::gather() {
        if family.get_name() != "biznest_client_requests_total" {
            continue;
        }
        for metric in family.get_metric() {
            let count = metric.get_counter().get_value() as u64;
            total += count;
            let is_failure = metric
                .get_label()
                .iter()
                .any(|l| l.get_name() == "status" && l.get_value() != "2xx");
            if is_failure {
                failed += count;
            }
        }
    }
    (total, failed)
}
