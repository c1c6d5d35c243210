use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Scrapes of the exposition endpoint are not counted.
const METRICS_PATH: &str = "/metrics";

/// Records `purebred_http_requests_total` and
/// `purebred_http_request_duration_seconds`, labelled by route template so
/// `/owners/:owner_id` stays one series. Without an installed recorder the
/// macros are no-ops.
pub async fn metrics_middleware(
    matched_path: Option<MatchedPath>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let route = matched_path
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    if route == METRICS_PATH {
        return next.run(req).await;
    }

    let method = req.method().as_str().to_owned();
    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = start.elapsed().as_secs_f64();

    let labels = [
        ("method", method),
        ("route", route),
        ("status", response.status().as_u16().to_string()),
    ];
    counter!("purebred_http_requests_total", &labels).increment(1);
    histogram!("purebred_http_request_duration_seconds", &labels).record(elapsed);

    response
}

/// Install the process-wide Prometheus recorder. Call once from `main`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
