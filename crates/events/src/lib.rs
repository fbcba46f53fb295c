//! Transient user-facing notifications.
//!
//! Only one notification is current at a time: publishing replaces whatever
//! was showing, and a notification lapses once its display window has passed
//! or it is dismissed. Nothing here is durable.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use malaeb_kernel::Clock;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_TTL_MS: i64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Epoch milliseconds at publication, bumped to stay strictly increasing.
    pub id: i64,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(skip)]
    pub issued_at: NaiveDateTime,
}

/// Single-slot, self-expiring notification channel.
pub struct Notifier {
    clock: Arc<dyn Clock>,
    ttl: Duration,
    last_id: Mutex<i64>,
    current: watch::Sender<Option<Notification>>,
}

impl Notifier {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            clock,
            ttl,
            last_id: Mutex::new(0),
            current,
        }
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.publish(message.into(), NotificationKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.publish(message.into(), NotificationKind::Error)
    }

    fn publish(&self, message: String, kind: NotificationKind) -> Notification {
        let issued_at = self.clock.now();
        let id = {
            let mut last = self.last_id.lock();
            let id = issued_at.and_utc().timestamp_millis().max(*last + 1);
            *last = id;
            id
        };

        let notification = Notification {
            id,
            message,
            kind,
            issued_at,
        };
        tracing::debug!(id, kind = ?kind, message = %notification.message, "notification published");

        if let Some(previous) = self.current.send_replace(Some(notification.clone())) {
            tracing::trace!(id = previous.id, "notification superseded");
        }
        notification
    }

    /// The notification on display right now, if it has not lapsed.
    pub fn current(&self) -> Option<Notification> {
        let now = self.clock.now();
        self.current
            .borrow()
            .as_ref()
            .filter(|n| now < n.issued_at + self.ttl)
            .cloned()
    }

    /// Close the notification early. Ids that are no longer current are ignored.
    pub fn dismiss(&self, id: i64) -> bool {
        self.current.send_if_modified(|slot| match slot {
            Some(n) if n.id == id => {
                *slot = None;
                true
            }
            _ => false,
        })
    }

    /// Follow the latest published value; intermediate values may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use malaeb_kernel::FixedClock;

    fn ttl() -> Duration {
        Duration::milliseconds(DEFAULT_TTL_MS)
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
        ))
    }

    #[test]
    fn notification_expires_after_ttl() {
        let clock = clock();
        let notifier = Notifier::new(clock.clone(), ttl());

        notifier.success("Booking confirmed!");
        clock.advance(Duration::milliseconds(2999));
        assert!(notifier.current().is_some());

        clock.advance(Duration::milliseconds(1));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn newer_notification_replaces_older() {
        let clock = clock();
        let notifier = Notifier::new(clock.clone(), ttl());

        let first = notifier.success("Booking confirmed!");
        let second = notifier.error("Error cancelling booking.");
        assert!(second.id > first.id);

        let current = notifier.current().unwrap();
        assert_eq!(current.id, second.id);
        assert_eq!(current.kind, NotificationKind::Error);
    }

    #[test]
    fn dismiss_only_clears_matching_id() {
        let clock = clock();
        let notifier = Notifier::new(clock, ttl());

        let first = notifier.success("one");
        let second = notifier.success("two");
        assert!(!notifier.dismiss(first.id));
        assert!(notifier.current().is_some());
        assert!(notifier.dismiss(second.id));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn subscribers_see_latest_value() {
        let notifier = Notifier::new(clock(), ttl());
        let rx = notifier.subscribe();
        notifier.success("one");
        notifier.success("two");
        let latest = rx.borrow().clone().unwrap();
        assert_eq!(latest.message, "two");
    }

    #[test]
    fn serializes_without_internal_timestamp() {
        let notifier = Notifier::new(clock(), ttl());
        let n = notifier.success("Invoice added successfully.");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "success");
        assert!(json.get("issuedAt").is_none());
    }
}
