//! Notification lifecycle: arrival, expiry, and read-state tracking. The
//! list is kept newest first. Read-state changes are optimistic; the
//! matching backend write is fire-and-forget and never rolled back.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{RouteId, RunId, TripId, UnixTimeMs};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotificationId(pub u64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why the block waiver behind a notification was issued. Closed set,
/// mirrored from the backend feed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationReason {
    Manpower,
    Disabled,
    Diverted,
    Accident,
    Adjusted,
    OperatorError,
    Traffic,
    Other,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationReadState {
    Unread,
    Read,
}

/// Immutable once created, except for `state`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub reason: NotificationReason,
    pub route_ids: Vec<RouteId>,
    pub run_ids: Vec<RunId>,
    pub trip_ids: Vec<TripId>,
    pub created_at: UnixTimeMs,
    pub state: NotificationReadState,
}

impl Notification {
    #[must_use]
    pub fn is_unread(&self) -> bool {
        self.state == NotificationReadState::Unread
    }
}

/// Events delivered by the shell's notification transport: one initial
/// snapshot on connect, then incremental arrivals.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ReceivedNotifications {
    Initial(Vec<Notification>),
    New(Notification),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct NotificationsState {
    /// Newest first.
    pub notifications: Vec<Notification>,
    /// Whether the latest-notification banner is showing.
    pub show_latest: bool,
}

impl NotificationsState {
    /// Wholesale replacement. Only the initial load recomputes the banner:
    /// it shows iff the newest notification is still unread, so a
    /// notification read in a previous session is not re-surfaced.
    pub fn set(&mut self, notifications: Vec<Notification>, is_initial_load: bool) {
        self.notifications = notifications;
        if is_initial_load {
            self.show_latest = self
                .notifications
                .first()
                .is_some_and(Notification::is_unread);
        }
    }

    /// A live arrival: prepend (newest-first invariant) and surface the
    /// banner.
    pub fn add(&mut self, notification: Notification) {
        self.notifications.insert(0, notification);
        self.show_latest = true;
    }

    /// Drops notifications whose age has reached the expiry window. Driven
    /// by an external timer.
    pub fn expire(&mut self, now: UnixTimeMs, expiry_ms: u64) {
        let before = self.notifications.len();
        self.notifications
            .retain(|n| now.elapsed_since(n.created_at) < expiry_ms);
        let dropped = before - self.notifications.len();
        if dropped > 0 {
            debug!(dropped, "expired notifications");
        }
    }

    /// Marks everything read, returning the ids whose state actually
    /// changed (the fire-and-forget backend write covers exactly those).
    pub fn mark_all_read(&mut self) -> Vec<NotificationId> {
        let mut changed = Vec::new();
        for notification in &mut self.notifications {
            if notification.is_unread() {
                notification.state = NotificationReadState::Read;
                changed.push(notification.id);
            }
        }
        changed
    }

    /// Flips one notification's read state, returning the new state for the
    /// backend write. Unknown ids are a no-op.
    pub fn toggle_read(&mut self, id: NotificationId) -> Option<NotificationReadState> {
        let notification = self.notifications.iter_mut().find(|n| n.id == id)?;
        notification.state = match notification.state {
            NotificationReadState::Unread => NotificationReadState::Read,
            NotificationReadState::Read => NotificationReadState::Unread,
        };
        Some(notification.state)
    }

    /// Dismisses the banner without touching the list.
    pub fn hide_latest(&mut self) {
        self.show_latest = false;
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }
}
