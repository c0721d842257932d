//! The notification queue.
//!
//! Entries live in a `watch` channel and every mutation replaces the list
//! in one `send_if_modified` call, so subscribers only ever see complete
//! states. Each non-persistent entry gets its own expiry task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use tokio::sync::watch;
use tracing::debug;

use super::{Notification, NotificationDraft, NotificationId};
use crate::domain::RouteId;

/// Result of [`NotificationQueue::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Added(NotificationId),
    /// A live alert of the same kind already exists for the route.
    Duplicate(NotificationId),
}

impl PushOutcome {
    pub fn id(&self) -> NotificationId {
        match self {
            PushOutcome::Added(id) | PushOutcome::Duplicate(id) => *id,
        }
    }
}

struct QueueInner {
    entries: watch::Sender<Vec<Notification>>,
    next_id: AtomicU64,
}

/// Ordered, deduplicated, self-expiring notifications.
///
/// Cloning is cheap and every clone shares the same queue.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        let (entries, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(QueueInner {
                entries,
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Queue a notification.
    ///
    /// Delay and warning alerts are limited to one live entry per route; a
    /// duplicate returns the existing id and leaves the queue unchanged.
    /// Non-persistent drafts spawn an expiry task, so this needs a tokio runtime.
    pub fn push(&self, draft: NotificationDraft) -> PushOutcome {
        let persistent = draft.persistent;
        let ttl = draft.expires_after;
        let id = NotificationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let mut outcome = PushOutcome::Added(id);

        self.inner.entries.send_if_modified(|entries| {
            let duplicate = draft
                .route_id
                .as_ref()
                .filter(|_| draft.kind.is_deduplicated())
                .and_then(|route| {
                    entries
                        .iter()
                        .find(|n| n.kind == draft.kind && n.route_id.as_ref() == Some(route))
                })
                .map(|n| n.id);

            if let Some(existing) = duplicate {
                outcome = PushOutcome::Duplicate(existing);
                return false;
            }

            entries.push(Notification::from_draft(id, draft, Utc::now()));
            true
        });

        if let PushOutcome::Added(id) = outcome {
            debug!(%id, persistent, "Notification queued");
            if !persistent {
                self.schedule_expiry(id, ttl);
            }
        }

        outcome
    }

    fn schedule_expiry(&self, id: NotificationId, ttl: std::time::Duration) {
        let weak: Weak<QueueInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                if (NotificationQueue { inner }).dismiss(id) {
                    debug!(%id, "Notification expired");
                }
            }
        });
    }

    /// Remove a notification. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.inner.entries.send_if_modified(|entries| {
            let before = entries.len();
            entries.retain(|n| n.id != id);
            entries.len() != before
        })
    }

    /// Remove the delay and warning alerts for a route that is running on
    /// time again. Returns the number of entries removed.
    pub fn dismiss_route_alerts(&self, route_id: &RouteId) -> usize {
        let mut removed = 0;
        self.inner.entries.send_if_modified(|entries| {
            let before = entries.len();
            entries.retain(|n| !n.is_route_alert(route_id));
            removed = before - entries.len();
            removed > 0
        });
        if removed > 0 {
            debug!(route = %route_id, removed, "Route recovered, alerts dismissed");
        }
        removed
    }

    /// Snapshot of the live notifications, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.inner.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Watch the notification list.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.entries.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notify::NotificationKind;

    fn route(id: &str) -> RouteId {
        RouteId::new(id).unwrap()
    }

    fn delay_alert(id: &str) -> NotificationDraft {
        NotificationDraft::new(NotificationKind::Delay, format!("{id} is late")).for_route(route(id))
    }

    #[tokio::test(start_paused = true)]
    async fn general_notice_expires_after_twelve_seconds() {
        let queue = NotificationQueue::new();
        let id = queue.push(NotificationDraft::info("Showing Route 2 to Galle on map")).id();

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(queue.list().len(), 1);
        assert_eq!(queue.list()[0].id, id);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_entries_stay() {
        let queue = NotificationQueue::new();
        queue.push(NotificationDraft::new(NotificationKind::Cancellation, "cancelled").for_route(route("a")));

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_route_alert_is_rejected() {
        let queue = NotificationQueue::new();

        let first = queue.push(delay_alert("bus_route_2"));
        let second = queue.push(delay_alert("bus_route_2"));

        assert!(matches!(first, PushOutcome::Added(_)));
        assert_eq!(second, PushOutcome::Duplicate(first.id()));
        assert_eq!(queue.len(), 1);

        // Other routes and other kinds are independent.
        queue.push(delay_alert("bus_route_32"));
        queue.push(
            NotificationDraft::new(NotificationKind::Warning, "late").for_route(route("bus_route_2")),
        );
        assert_eq!(queue.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn alert_can_repeat_after_expiry() {
        let queue = NotificationQueue::new();
        let first = queue.push(delay_alert("train_coastal")).id();

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(queue.is_empty());

        let again = queue.push(delay_alert("train_coastal"));
        assert!(matches!(again, PushOutcome::Added(id) if id != first));
    }

    #[tokio::test(start_paused = true)]
    async fn ids_increase_and_order_is_insertion() {
        let queue = NotificationQueue::new();
        let a = queue.push(NotificationDraft::info("a")).id();
        let b = queue.push(NotificationDraft::success("b")).id();
        let c = queue.push(NotificationDraft::error("c")).id();

        assert!(a < b && b < c);
        let messages: Vec<_> = queue.list().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, ["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_is_idempotent() {
        let queue = NotificationQueue::new();
        let id = queue.push(NotificationDraft::info("x")).id();

        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
        assert!(!queue.dismiss(NotificationId(999)));

        // The expiry timer firing later is harmless.
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn route_alerts_are_dismissed_on_recovery() {
        let queue = NotificationQueue::new();
        queue.push(delay_alert("bus_route_1"));
        queue.push(NotificationDraft::info("unrelated"));
        queue.push(
            NotificationDraft::new(NotificationKind::Cancellation, "gone").for_route(route("bus_route_1")),
        );

        assert_eq!(queue.dismiss_route_alerts(&route("bus_route_1")), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dismiss_route_alerts(&route("bus_route_1")), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_changes() {
        let queue = NotificationQueue::new();
        let mut rx = queue.subscribe();

        queue.push(NotificationDraft::info("hello"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        // A rejected duplicate does not notify.
        queue.push(delay_alert("r"));
        rx.changed().await.unwrap();
        rx.borrow_and_update();
        queue.push(delay_alert("r"));
        assert!(!rx.has_changed().unwrap());
    }
}
