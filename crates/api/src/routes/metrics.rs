//! Prometheus metrics endpoint and metric descriptions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics::{Unit, describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusHandle;

/// Registers help text for every metric the service emits.
///
/// Call once after the recorder is installed.
pub fn describe() {
    describe_counter!("trips_created_total", "Trips created");
    describe_counter!("trips_confirmed_total", "Trip confirmations accepted");
    describe_counter!("participants_invited_total", "Participants invited after creation");
    describe_counter!("participants_confirmed_total", "Participants who confirmed attendance");
    describe_counter!(
        "notifications_dispatched_total",
        "Notification tasks spawned, by kind"
    );
    describe_counter!(
        "notifications_failed_total",
        "Notification attempts that failed, by kind"
    );
    describe_histogram!(
        "notification_duration_seconds",
        Unit::Seconds,
        "Time spent sending one notification"
    );
}

/// GET /metrics: returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
