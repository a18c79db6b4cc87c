//! Notification service trait and implementations.

pub mod mailer;
pub mod memory;
pub mod service;
pub mod smtp;
pub mod template;

pub use mailer::TracingMailer;
pub use memory::{InMemoryNotificationService, SentNotification};
pub use service::{NotificationError, NotificationKind, NotificationService, TripContext};
pub use smtp::SmtpMailer;
pub use template::EmailMessage;
