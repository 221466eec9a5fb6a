//! Per-request HTTP metrics
//!
//! - `http_requests_total`: counter labelled `method`, `path`, `status`
//! - `http_request_duration_seconds`: histogram labelled `method`, `path`
//!
//! `path` is the route template (`/api/v1/smoking-places/{sp_id}`) so ids
//! stay out of the label set. Requests that match no route share the
//! `unmatched` label.

use std::time::{Duration, Instant};

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};

struct RouteLabels {
    method: String,
    path: String,
}

impl RouteLabels {
    fn of(request: &Request<Body>) -> Self {
        Self {
            method: request.method().to_string(),
            path: request
                .extensions()
                .get::<MatchedPath>()
                .map_or_else(|| "unmatched".to_string(), |mp| mp.as_str().to_string()),
        }
    }

    fn record(self, status: u16, elapsed: Duration) {
        metrics::counter!(
            "http_requests_total",
            "method" => self.method.clone(),
            "path" => self.path.clone(),
            "status" => status.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => self.method,
            "path" => self.path
        )
        .record(elapsed.as_secs_f64());
    }
}

pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let labels = RouteLabels::of(&request);
    let started = Instant::now();

    let response = next.run(request).await;

    labels.record(response.status().as_u16(), started.elapsed());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn unrouted_requests_share_one_label() {
        let request = Request::builder()
            .uri("/no/such/route/42")
            .body(Body::empty())
            .unwrap();
        let labels = RouteLabels::of(&request);
        assert_eq!(labels.path, "unmatched");
        assert_eq!(labels.method, "GET");
    }

    #[test]
    fn records_counter_and_histogram() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            RouteLabels {
                method: "POST".into(),
                path: "/api/v1/smoking-places/{sp_id}/reservation".into(),
            }
            .record(201, Duration::from_millis(5));
        });

        let text = handle.render();
        assert!(text.contains("http_requests_total{"));
        assert!(text.contains("status=\"201\""));
        assert!(text.contains("http_request_duration_seconds"));
    }
}
