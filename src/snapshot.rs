//! Durable UI-state snapshot. A filtered subset of the state tree survives
//! restarts in the shell's key-value store (browser local storage in the
//! reference shell). Loading deep-merges onto defaults: keys absent from the
//! stored blob never overwrite defaults, unknown keys are ignored, and a
//! malformed blob degrades to defaults with a warning.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::{Model, RouteId, SavedQuery, VehicleOrGhost};
use crate::view::OpenView;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// The persisted subset. Every field is optional so old or partial blobs
/// merge cleanly; serialization always writes the full set.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    pub open_view: Option<OpenView>,
    /// Legacy key from before the drawer became an `OpenView`; folded into
    /// `open_view` on load when no `open_view` is stored.
    pub notification_drawer_is_open: Option<bool>,
    pub picker_container_is_visible: Option<bool>,
    pub selected_shuttle_route_ids: Option<Vec<RouteId>>,
    pub selected_vehicle: Option<VehicleOrGhost>,
    pub search_saved_queries: Option<Vec<SavedQuery>>,
}

impl Snapshot {
    /// The subset of `model` worth persisting, drawn from the active page's
    /// view slot.
    #[must_use]
    pub fn capture(model: &Model) -> Self {
        let page = model.view.current();
        Self {
            open_view: Some(page.open_view),
            notification_drawer_is_open: Some(page.open_view == OpenView::NotificationDrawer),
            picker_container_is_visible: Some(model.picker_container_is_visible),
            selected_shuttle_route_ids: Some(model.selected_shuttle_route_ids.clone()),
            selected_vehicle: page.selected_vehicle.clone(),
            search_saved_queries: Some(model.search_saved_queries.clone()),
        }
    }

    /// Merges the stored keys onto `model`, leaving defaults in place for
    /// anything absent. Applied once at startup, before any user action.
    pub fn apply(self, model: &mut Model) {
        let restored_view = self.open_view.or(match self.notification_drawer_is_open {
            Some(true) => Some(OpenView::NotificationDrawer),
            _ => None,
        });
        if let Some(view) = restored_view {
            let page = model.view.page_mut(model.view.current_path);
            page.open_view = view;
        }
        if let Some(vehicle) = self.selected_vehicle {
            let page = model.view.page_mut(model.view.current_path);
            page.selected_vehicle = Some(vehicle);
        }
        if let Some(visible) = self.picker_container_is_visible {
            model.picker_container_is_visible = visible;
        }
        if let Some(route_ids) = self.selected_shuttle_route_ids {
            model.selected_shuttle_route_ids = route_ids;
        }
        if let Some(queries) = self.search_saved_queries {
            model.search_saved_queries = queries;
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        serde_json::from_slice(bytes).map_err(SnapshotError::Decode)
    }
}

/// Restores a stored blob onto `model`. Absent or malformed blobs leave the
/// defaults untouched.
pub fn restore(model: &mut Model, data: Option<&[u8]>) {
    let Some(bytes) = data else {
        return;
    };
    match Snapshot::from_bytes(bytes) {
        Ok(snapshot) => snapshot.apply(model),
        Err(error) => warn!(%error, "ignoring unreadable UI-state snapshot"),
    }
}
