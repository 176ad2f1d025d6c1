//! Transient notification service.
//!
//! Views publish short success/error messages here instead of drawing them
//! directly. Front-ends subscribe to [`NotificationEvent`]s and render them.
//! Each notification is shown immediately, starts dismissing after the display
//! delay and is removed once the dismiss animation has elapsed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::config::ClientConfig;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    Visible,
    Dismissing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: NotificationPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissing(u64),
    Removed(u64),
}

/// How long a notification stays up and how long its exit takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub display: Duration,
    pub dismiss_animation: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(3000),
            dismiss_animation: Duration::from_millis(300),
        }
    }
}

impl From<&ClientConfig> for NotificationTiming {
    fn from(config: &ClientConfig) -> Self {
        Self {
            display: config.notification_display(),
            dismiss_animation: config.notification_dismiss(),
        }
    }
}

struct Inner {
    active: Mutex<Vec<Notification>>,
    next_id: AtomicU64,
    events: broadcast::Sender<NotificationEvent>,
    timing: NotificationTiming,
}

/// Queue of on-screen notifications. Cloning shares the same queue.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationTiming::default())
    }
}

impl NotificationCenter {
    pub fn new(timing: NotificationTiming) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                active: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                events,
                timing,
            }),
        }
    }

    pub fn timing(&self) -> NotificationTiming {
        self.inner.timing
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    /// Show a notification and schedule its dismissal.
    ///
    /// Outside a Tokio runtime nothing is scheduled; the notification stays
    /// until [`NotificationCenter::dismiss`] is called.
    pub fn notify(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let notification = Notification {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            message: message.into(),
            phase: NotificationPhase::Visible,
        };
        let id = notification.id;

        let message = &notification.message;
        match kind {
            NotificationKind::Success => tracing::info!(id, message = %message, "Notification"),
            NotificationKind::Error => tracing::warn!(id, message = %message, "Notification"),
        }

        self.active().push(notification.clone());
        let _ = self.inner.events.send(NotificationEvent::Shown(notification));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let center = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(center.inner.timing.display).await;
                    center.begin_dismiss(id);
                    tokio::time::sleep(center.inner.timing.dismiss_animation).await;
                    center.remove(id);
                });
            }
            Err(_) => {
                tracing::debug!(id, "No runtime available, notification will not auto-dismiss");
            }
        }

        id
    }

    /// Remove a notification right away, skipping the animation.
    pub fn dismiss(&self, id: u64) {
        self.remove(id);
    }

    /// Snapshot of the notifications currently on screen, oldest first.
    pub fn current(&self) -> Vec<Notification> {
        self.active().clone()
    }

    fn begin_dismiss(&self, id: u64) {
        let found = {
            let mut active = self.active();
            match active.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.phase = NotificationPhase::Dismissing;
                    true
                }
                None => false,
            }
        };
        if found {
            let _ = self.inner.events.send(NotificationEvent::Dismissing(id));
        }
    }

    fn remove(&self, id: u64) {
        let removed = {
            let mut active = self.active();
            let before = active.len();
            active.retain(|n| n.id != id);
            active.len() != before
        };
        if removed {
            let _ = self.inner.events.send(NotificationEvent::Removed(id));
        }
    }

    fn active(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
