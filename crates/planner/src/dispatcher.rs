//! Detached, bounded notification dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::Email;
use tokio::sync::{Notify, Semaphore};
use tracing::Instrument;

use crate::notification::{NotificationKind, NotificationService, TripContext};

/// Default number of notifications allowed to be sending at once.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// One notification to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: Email,
    pub trip: TripContext,
}

impl Notification {
    /// A "trip created" notification for the owner.
    pub fn trip_created(owner_email: Email, trip: TripContext) -> Self {
        Self {
            kind: NotificationKind::TripCreated,
            recipient: owner_email,
            trip,
        }
    }

    /// An invitation to a participant.
    pub fn invitation(recipient: Email, trip: TripContext) -> Self {
        Self {
            kind: NotificationKind::Invitation,
            recipient,
            trip,
        }
    }
}

struct DispatcherInner {
    service: Arc<dyn NotificationService>,
    permits: Arc<Semaphore>,
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight count when a dispatched task ends, however it ends.
struct InFlightGuard(Arc<DispatcherInner>);

impl InFlightGuard {
    fn new(inner: Arc<DispatcherInner>) -> Self {
        inner.in_flight.fetch_add(1, Ordering::AcqRel);
        Self(inner)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Runs notifications as fire-and-forget tokio tasks.
///
/// `dispatch` never waits: each notification gets its own task, and the
/// number of tasks actually talking to the notification service at the same
/// time is capped by a semaphore. Outcomes are only logged and counted.
#[derive(Clone)]
pub struct NotificationDispatcher {
    inner: Arc<DispatcherInner>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over a notification service.
    ///
    /// `max_in_flight` is clamped to at least one.
    pub fn new(service: Arc<dyn NotificationService>, max_in_flight: usize) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                service,
                permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Spawns one detached task delivering the notification.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, notification: Notification) {
        let guard = InFlightGuard::new(self.inner.clone());
        metrics::counter!("notifications_dispatched_total", "kind" => notification.kind.as_str())
            .increment(1);

        let span = tracing::info_span!(
            "notification",
            kind = %notification.kind,
            recipient = %notification.recipient,
            trip_id = %notification.trip.trip_id,
        );
        tokio::spawn(deliver(guard, notification).instrument(span));
    }

    /// Returns the number of dispatched notifications that have not finished.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Waits until every dispatched notification has finished.
    pub async fn drain(&self) {
        loop {
            let idle = self.inner.idle.notified();
            if self.in_flight() == 0 {
                return;
            }
            idle.await;
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("in_flight", &self.in_flight())
            .field("available_permits", &self.inner.permits.available_permits())
            .finish()
    }
}

async fn deliver(guard: InFlightGuard, notification: Notification) {
    let inner = &guard.0;
    let Ok(_permit) = inner.permits.clone().acquire_owned().await else {
        tracing::error!("notification semaphore closed, dropping notification");
        return;
    };

    let started = std::time::Instant::now();
    let Notification {
        kind,
        recipient,
        trip,
    } = notification;
    let result = match kind {
        NotificationKind::TripCreated => inner.service.notify_trip_created(&recipient, &trip).await,
        NotificationKind::Invitation => inner.service.notify_invitation(&recipient, &trip).await,
    };
    metrics::histogram!("notification_duration_seconds").record(started.elapsed().as_secs_f64());

    match result {
        Ok(()) => tracing::debug!("notification sent"),
        Err(e) => {
            metrics::counter!("notifications_failed_total", "kind" => kind.as_str()).increment(1);
            tracing::error!(error = %e, "failed to send notification");
        }
    }
}
