//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use planner::{InMemoryNotificationService, NotificationKind};
use serde_json::{Value, json};
use tower::ServiceExt;
use trip_store::{InMemoryTripStore, StoreOperation};

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    store: InMemoryTripStore,
    notifier: InMemoryNotificationService,
    state: std::sync::Arc<api::routes::AppState<InMemoryTripStore>>,
}

impl TestApp {
    fn new() -> Self {
        let (state, store, notifier) = api::create_default_state();
        let router = api::create_app(state.clone(), get_metrics_handle());
        Self {
            router,
            store,
            notifier,
            state,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_paris(&self) -> String {
        let (status, json) = self
            .send(
                "POST",
                "/trips",
                Some(json!({
                    "destination": "Paris",
                    "owner_name": "Ana",
                    "owner_email": "a@x.com",
                    "starts_at": "2025-01-10T00:00:00Z",
                    "ends_at": "2025-01-15T00:00:00Z",
                    "emails_to_invite": ["b@x.com"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["trip_id"].as_str().unwrap().to_string()
    }

    async fn settle(&self) {
        self.state.planner.dispatcher().drain().await;
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["storage"], "memory");
    assert_eq!(json["pending_notifications"], 0);
}

#[tokio::test]
async fn test_create_and_get_trip() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;
    app.settle().await;

    let (status, json) = app.send("GET", &format!("/trips/{trip_id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["trip"]["id"], trip_id.as_str());
    assert_eq!(json["trip"]["destination"], "Paris");
    assert_eq!(json["trip"]["owner_email"], "a@x.com");
    assert_eq!(json["trip"]["is_confirmed"], false);
    assert_eq!(app.notifier.attempt_count(NotificationKind::TripCreated), 1);
}

#[tokio::test]
async fn test_create_trip_validation_error() {
    let app = TestApp::new();

    let (status, json) = app
        .send(
            "POST",
            "/trips",
            Some(json!({
                "destination": "Paris",
                "owner_name": "Ana",
                "owner_email": "a@x.com",
                "starts_at": "2025-01-15T00:00:00Z",
                "ends_at": "2025-01-10T00:00:00Z"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid input"));
    assert_eq!(app.store.trip_count().await, 0);
}

#[tokio::test]
async fn test_overlong_destination_is_bad_request() {
    let app = TestApp::new();

    let (status, json) = app
        .send(
            "POST",
            "/trips",
            Some(json!({
                "destination": "P".repeat(planner::MAX_TEXT_LEN + 1),
                "owner_name": "Ana",
                "owner_email": "a@x.com",
                "starts_at": "2025-01-10T00:00:00Z",
                "ends_at": "2025-01-15T00:00:00Z"
            })),
        )
        .await;
    app.settle().await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["error"],
        "Invalid input: destination must be at most 255 characters"
    );
    assert_eq!(app.store.trip_count().await, 0);
    assert!(app.notifier.attempts().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = TestApp::new();

    let (status, json) = app
        .send("POST", "/trips", Some(json!({ "destination": "Paris" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_confirm_trip_sends_invitations() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;

    let (status, _) = app
        .send("GET", &format!("/trips/{trip_id}/confirm"), None)
        .await;
    app.settle().await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, json) = app.send("GET", &format!("/trips/{trip_id}"), None).await;
    assert_eq!(json["trip"]["is_confirmed"], true);
    assert_eq!(app.notifier.attempt_count(NotificationKind::Invitation), 2);
}

#[tokio::test]
async fn test_confirm_unknown_trip() {
    let app = TestApp::new();

    let (status, json) = app
        .send(
            "GET",
            "/trips/00000000-0000-0000-0000-000000000000/confirm",
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_invalid_trip_id_format() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/trips/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid ID format")
    );
}

#[tokio::test]
async fn test_invite_and_confirm_participant() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;

    let (status, json) = app
        .send(
            "POST",
            &format!("/trips/{trip_id}/invites"),
            Some(json!({ "email": "c@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let participant_id = json["participant_id"].as_str().unwrap().to_string();

    let uri = format!("/participants/{participant_id}/confirm");
    let (first, _) = app.send("PATCH", &uri, None).await;
    let (second, json) = app.send("PATCH", &uri, None).await;
    app.settle().await;

    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(json["error"].as_str().is_some());

    let (_, json) = app
        .send("GET", &format!("/trips/{trip_id}/participants"), None)
        .await;
    let participants = json["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 3);
    assert_eq!(participants[2]["email"], "c@x.com");
    assert_eq!(participants[2]["is_confirmed"], true);
    assert_eq!(app.notifier.attempt_count(NotificationKind::Invitation), 1);
}

#[tokio::test]
async fn test_invite_malformed_email() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;
    app.settle().await;

    let (status, _) = app
        .send(
            "POST",
            &format!("/trips/{trip_id}/invites"),
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
    app.settle().await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.participant_count().await, 2);
    assert_eq!(app.notifier.attempt_count(NotificationKind::Invitation), 0);
}

#[tokio::test]
async fn test_confirm_unknown_participant() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            "PATCH",
            "/participants/00000000-0000-0000-0000-000000000000/confirm",
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_trip() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;

    let (status, _) = app
        .send(
            "PUT",
            &format!("/trips/{trip_id}"),
            Some(json!({
                "destination": "Lyon",
                "starts_at": "2025-02-01T00:00:00Z",
                "ends_at": "2025-02-03T00:00:00Z"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = app.send("GET", &format!("/trips/{trip_id}"), None).await;
    assert_eq!(json["trip"]["destination"], "Lyon");
}

#[tokio::test]
async fn test_activities_grouped_by_day() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;
    let uri = format!("/trips/{trip_id}/activities");

    for (title, at) in [
        ("Louvre", "2025-01-12T10:00:00Z"),
        ("Breakfast", "2025-01-11T08:00:00Z"),
        ("Dinner", "2025-01-11T20:00:00Z"),
    ] {
        let (status, json) = app
            .send("POST", &uri, Some(json!({ "title": title, "occurs_at": at })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(json["activity_id"].as_str().is_some());
    }

    let (status, json) = app.send("GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let days = json["activities"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2025-01-11");
    assert_eq!(days[0]["activities"][0]["title"], "Breakfast");
    assert_eq!(days[1]["activities"][0]["title"], "Louvre");
}

#[tokio::test]
async fn test_links() {
    let app = TestApp::new();
    let trip_id = app.create_paris().await;
    let uri = format!("/trips/{trip_id}/links");

    let (status, _) = app
        .send(
            "POST",
            &uri,
            Some(json!({ "title": "Hotel", "url": "https://example.com/hotel" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            &uri,
            Some(json!({ "title": "Bad", "url": "ftp://example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = app.send("GET", &uri, None).await;
    let links = json["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["url"], "https://example.com/hotel");
}

#[tokio::test]
async fn test_store_failure_returns_generic_message() {
    let app = TestApp::new();
    app.store.set_fail_on(StoreOperation::CreateTrip, true).await;

    let (status, json) = app
        .send(
            "POST",
            "/trips",
            Some(json!({
                "destination": "Paris",
                "owner_name": "Ana",
                "owner_email": "a@x.com",
                "starts_at": "2025-01-10T00:00:00Z",
                "ends_at": "2025-01-15T00:00:00Z"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Something went wrong, please try again.");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();
    app.create_paris().await;
    app.settle().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("trips_created_total"));
}
