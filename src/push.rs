//! Coalescing outbox for route-tab persistence.
//!
//! At most one push is ever in flight. Edits made while a payload is queued
//! or flying are buffered into a single "next" slot, newest wins. A failed
//! push may be retried with a bounded budget, but never over fresher local
//! state: the most recent snapshot always wins.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::route_tabs::RouteTab;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PushState {
    /// Snapshot queued for the next push, or the one currently in flight.
    pub to_push: Option<Vec<RouteTab>>,
    /// Newer snapshot buffered while `to_push` is occupied. Overwritten by
    /// every subsequent edit; intermediate states are never sent.
    pub to_push_next: Option<Vec<RouteTab>>,
    pub in_progress: bool,
    /// Retry budget for the payload in `to_push`.
    pub retries_remaining: u32,
}

impl PushState {
    /// A persistable tab change happened; queue the fresh snapshot.
    pub fn record_edit(&mut self, route_tabs: &[RouteTab], budget: u32) {
        if self.to_push.is_none() {
            self.to_push = Some(route_tabs.to_vec());
            self.retries_remaining = budget;
        } else {
            self.to_push_next = Some(route_tabs.to_vec());
        }
    }

    /// A push is starting: promote any buffered snapshot over the queued one
    /// and hand back the payload to send with its retry budget. Returns
    /// `None` (and stays idle) when nothing is queued.
    pub fn start(&mut self, budget: u32) -> Option<(Vec<RouteTab>, u32)> {
        if self.to_push_next.is_some() {
            self.to_push = self.to_push_next.take();
            self.retries_remaining = budget;
        }
        let payload = self.to_push.clone()?;
        self.in_progress = true;
        debug!(
            tabs = payload.len(),
            retries = self.retries_remaining,
            "starting route tabs push"
        );
        Some((payload, self.retries_remaining))
    }

    /// The in-flight push finished (or was abandoned). The buffered "next"
    /// snapshot is deliberately left in place; only the next `start`
    /// promotes it.
    pub fn complete(&mut self) {
        self.to_push = None;
        self.in_progress = false;
    }

    /// A push failed with budget remaining. Requeue the payload verbatim —
    /// unless a newer snapshot was buffered while it flew, in which case the
    /// stale payload is dropped and the newer one will be promoted by the
    /// next `start`.
    pub fn retry_if_not_outdated(&mut self, route_tabs: Vec<RouteTab>, retries_left: u32) {
        self.in_progress = false;
        if self.to_push_next.is_some() {
            debug!("dropping failed push payload; a newer snapshot supersedes it");
            self.to_push = None;
        } else {
            warn!(retries_left, "route tabs push failed; requeueing");
            self.to_push = Some(route_tabs);
            self.retries_remaining = retries_left;
        }
    }

    /// Whether the external driver should dispatch a starting-push event.
    #[must_use]
    pub fn needs_push(&self) -> bool {
        !self.in_progress && (self.to_push.is_some() || self.to_push_next.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteId;

    // Deterministic uuid so snapshots of the same routes compare equal.
    fn snapshot(routes: &[&str]) -> Vec<RouteTab> {
        let mut tab = RouteTab::new(0);
        tab.uuid = uuid::Uuid::from_u128(1);
        tab.is_current_tab = true;
        tab.selected_route_ids = routes.iter().map(|r| RouteId::new(*r)).collect();
        vec![tab]
    }

    #[test]
    fn first_edit_queues_directly() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);

        assert!(push.to_push.is_some());
        assert!(push.to_push_next.is_none());
        assert_eq!(push.retries_remaining, 2);
    }

    #[test]
    fn later_edits_coalesce_into_the_next_slot() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);
        push.record_edit(&snapshot(&["1", "2"]), 2);
        push.record_edit(&snapshot(&["1", "2", "3"]), 2);

        assert_eq!(push.to_push, Some(snapshot(&["1"])));
        // Only the latest buffered snapshot survives.
        assert_eq!(push.to_push_next, Some(snapshot(&["1", "2", "3"])));
    }

    #[test]
    fn start_promotes_the_buffered_snapshot() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);
        push.record_edit(&snapshot(&["1", "2"]), 2);

        let (payload, retries) = push.start(2).unwrap();
        assert_eq!(payload, snapshot(&["1", "2"]));
        assert_eq!(retries, 2);
        assert!(push.in_progress);
        assert!(push.to_push_next.is_none());
    }

    #[test]
    fn start_with_nothing_queued_stays_idle() {
        let mut push = PushState::default();
        assert!(push.start(2).is_none());
        assert!(!push.in_progress);
    }

    #[test]
    fn complete_does_not_promote_the_buffered_snapshot() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);
        push.start(2);
        push.record_edit(&snapshot(&["1", "2"]), 2);
        push.complete();

        assert!(push.to_push.is_none());
        assert!(!push.in_progress);
        assert_eq!(push.to_push_next, Some(snapshot(&["1", "2"])));
        assert!(push.needs_push());
    }

    #[test]
    fn retry_requeues_verbatim_when_nothing_newer_exists() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);
        let (payload, retries) = push.start(2).unwrap();

        push.retry_if_not_outdated(payload.clone(), retries - 1);
        assert_eq!(push.to_push, Some(payload));
        assert_eq!(push.retries_remaining, 1);
        assert!(!push.in_progress);
    }

    #[test]
    fn retry_drops_the_stale_payload_when_superseded() {
        let mut push = PushState::default();
        push.record_edit(&snapshot(&["1"]), 2);
        let (payload, retries) = push.start(2).unwrap();
        push.record_edit(&snapshot(&["1", "2"]), 2);

        push.retry_if_not_outdated(payload, retries - 1);
        assert!(push.to_push.is_none());

        // The next start sends the fresher snapshot with a fresh budget.
        let (next_payload, next_retries) = push.start(2).unwrap();
        assert_eq!(next_payload, snapshot(&["1", "2"]));
        assert_eq!(next_retries, 2);
    }
}
