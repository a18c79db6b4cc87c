//! API server entry point.

use std::sync::Arc;
use std::time::Duration;

use api::config::Config;
use api::routes::AppState;
use common::Email;
use metrics_exporter_prometheus::PrometheusHandle;
use planner::{NotificationService, SmtpMailer, TracingMailer};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use trip_store::{InMemoryTripStore, PostgresTripStore, TripStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// How long shutdown waits for pending notifications.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Serves the application until shutdown, then drains pending notifications.
async fn serve<S: TripStore + 'static>(
    config: &Config,
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Result<(), BoxError> {
    let dispatcher = state.planner.dispatcher().clone();
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let pending = dispatcher.in_flight();
    if pending > 0 {
        tracing::info!(pending, "waiting for pending notifications");
    }
    if tokio::time::timeout(DRAIN_TIMEOUT, dispatcher.drain())
        .await
        .is_err()
    {
        tracing::warn!(
            abandoned = dispatcher.in_flight(),
            "notification drain timed out"
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    api::routes::metrics::describe();

    // 3. Notification service
    let from = Email::parse(&config.mail_from)?;
    let mailer: Arc<dyn NotificationService> = match &config.smtp_host {
        Some(host) => {
            let smtp = SmtpMailer::new(host, config.smtp_port, from)?;
            tracing::info!(relay = smtp.relay(), "sending email through SMTP relay");
            Arc::new(smtp)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will not be sent");
            Arc::new(TracingMailer::new(from))
        }
    };

    // 4. Storage backend, then serve
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await?;
            let store = PostgresTripStore::new(pool);
            store.run_migrations().await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "using PostgreSQL trip store"
            );

            let state =
                api::create_state(store, mailer, config.notify_max_in_flight, "postgres");
            serve(&config, state, metrics_handle).await?;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory trip store");
            let state = api::create_state(
                InMemoryTripStore::new(),
                mailer,
                config.notify_max_in_flight,
                "memory",
            );
            serve(&config, state, metrics_handle).await?;
        }
    }

    tracing::info!("server shut down gracefully");
    Ok(())
}
