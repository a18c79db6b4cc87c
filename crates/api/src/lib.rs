//! HTTP API server with observability for the trip planner.
//!
//! Exposes the trip lifecycle (create, confirm, invite, confirm participant)
//! plus activities and links as REST endpoints, with structured logging
//! (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use planner::{
    InMemoryNotificationService, NotificationDispatcher, NotificationService, TripPlanner,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trip_store::{InMemoryTripStore, TripStore};

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: TripStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/trips", post(routes::trips::create::<S>))
        .route(
            "/trips/{id}",
            get(routes::trips::get::<S>).put(routes::trips::update::<S>),
        )
        .route("/trips/{id}/confirm", get(routes::trips::confirm::<S>))
        .route("/trips/{id}/invites", post(routes::trips::invite::<S>))
        .route(
            "/trips/{id}/participants",
            get(routes::participants::list::<S>),
        )
        .route(
            "/trips/{id}/activities",
            get(routes::activities::list::<S>).post(routes::activities::create::<S>),
        )
        .route(
            "/trips/{id}/links",
            get(routes::links::list::<S>).post(routes::links::create::<S>),
        )
        .route(
            "/participants/{id}/confirm",
            patch(routes::participants::confirm::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over a store and a notification service.
pub fn create_state<S: TripStore + 'static>(
    store: S,
    notifier: Arc<dyn NotificationService>,
    max_in_flight: usize,
    backend: &'static str,
) -> Arc<AppState<S>> {
    let dispatcher = NotificationDispatcher::new(notifier, max_in_flight);
    Arc::new(AppState {
        planner: TripPlanner::new(store, dispatcher),
        backend,
    })
}

/// Creates the default application state with an in-memory store and a
/// recording notification service.
///
/// The store and notifier handles are returned for inspection.
pub fn create_default_state() -> (
    Arc<AppState<InMemoryTripStore>>,
    InMemoryTripStore,
    InMemoryNotificationService,
) {
    let store = InMemoryTripStore::new();
    let notifier = InMemoryNotificationService::new();
    let state = create_state(
        store.clone(),
        Arc::new(notifier.clone()),
        planner::DEFAULT_MAX_IN_FLIGHT,
        "memory",
    );
    (state, store, notifier)
}
