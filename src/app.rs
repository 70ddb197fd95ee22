//! The application core: one `update` entry point composing the route-tab,
//! push, view-navigation, and notification reducers, plus the effect edges
//! (backend persistence, durable snapshot, render).

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::capabilities::{ApiOutput, Capabilities};
use crate::event::Event;
use crate::model::{Model, RouteId, SavedQuery};
use crate::notifications::Notification;
use crate::route_tabs::{self, RouteTab};
use crate::snapshot::{self, Snapshot};
use crate::view::{OpenView, PagePath, PageViewState};
use crate::{MAX_SAVED_SEARCH_QUERIES, SNAPSHOT_STORAGE_KEY};

#[derive(Default)]
pub struct App;

/// What the shell renders from, rebuilt after every event. Also carries the
/// observables the external push driver watches (`route_tabs_to_push`,
/// `push_in_progress`, `needs_push`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub current_path: PagePath,
    pub open_tabs: Vec<TabSummary>,
    pub page: PageViewState,

    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub show_latest_notification: bool,

    pub route_tabs_to_push: Option<Vec<RouteTab>>,
    pub push_in_progress: bool,
    pub needs_push: bool,

    pub picker_container_is_visible: bool,
    pub selected_shuttle_route_ids: Vec<RouteId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TabSummary {
    pub uuid: Uuid,
    pub ordering: u32,
    pub preset_name: Option<String>,
    pub selected_route_ids: Vec<RouteId>,
    pub is_current_tab: bool,
    pub is_edited_preset: bool,
}

impl App {
    /// Runs a tab operation; a persistable change feeds the push outbox with
    /// the fresh snapshot.
    fn reduce_route_tabs(model: &mut Model, apply: impl FnOnce(&mut Vec<RouteTab>) -> bool) {
        if apply(&mut model.route_tabs) {
            let budget = model.config.push_retries;
            model.push.record_edit(&model.route_tabs, budget);
        }
    }

    /// Issues the persistence call for a payload. The shell's verdict comes
    /// back as a push-pipeline event; failures spend the retry budget and
    /// are swallowed once it runs out.
    fn send_route_tabs(route_tabs: Vec<RouteTab>, retries: u32, caps: &Capabilities) {
        let payload = route_tabs.clone();
        caps.api.push_route_tabs(payload, move |result| match result {
            Ok(ApiOutput::RouteTabsPushed { ok: true }) => Event::RouteTabsPushComplete,
            _ if retries > 0 => Event::RetryRouteTabsPushIfNotOutdated {
                route_tabs,
                retries_left: retries - 1,
            },
            _ => {
                warn!("route tabs push abandoned after exhausting retries");
                Event::RouteTabsPushComplete
            }
        });
    }

    fn persist_snapshot_if_changed(before: &Snapshot, model: &Model, caps: &Capabilities) {
        let after = Snapshot::capture(model);
        if after != *before {
            match after.to_bytes() {
                Ok(bytes) => caps.storage.write(SNAPSHOT_STORAGE_KEY, bytes),
                Err(error) => warn!(%error, "could not encode UI-state snapshot"),
            }
        }
    }

    fn save_search_query(model: &mut Model, query: &str) {
        let text = query.trim();
        if text.is_empty() {
            return;
        }
        model.search_saved_queries.retain(|q| q.text != text);
        model.search_saved_queries.insert(
            0,
            SavedQuery {
                text: text.to_string(),
            },
        );
        model.search_saved_queries.truncate(MAX_SAVED_SEARCH_QUERIES);
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        // Snapshot writes are diff-triggered; the startup load itself must
        // not echo a write back.
        let skip_snapshot_save =
            matches!(event, Event::AppStarted | Event::SnapshotLoaded { .. });
        let snapshot_before = Snapshot::capture(model);

        match event {
            Event::Noop => {}

            Event::AppStarted => {
                caps.storage.read(SNAPSHOT_STORAGE_KEY, |result| {
                    let data = match result {
                        Ok(crate::capabilities::StorageOutput::Value(value)) => value,
                        _ => None,
                    };
                    Event::SnapshotLoaded { data }
                });
            }

            Event::SnapshotLoaded { data } => {
                snapshot::restore(model, data.as_deref());
            }

            Event::CreateRouteTab => {
                Self::reduce_route_tabs(model, route_tabs::create_tab);
            }

            Event::SelectRouteTab { uuid } => {
                Self::reduce_route_tabs(model, |tabs| route_tabs::select_tab(tabs, uuid));
            }

            Event::CloseRouteTab { uuid } => {
                Self::reduce_route_tabs(model, |tabs| route_tabs::close_tab(tabs, uuid));
            }

            Event::SelectRouteInTab { route_id } => {
                Self::reduce_route_tabs(model, |tabs| route_tabs::select_route(tabs, &route_id));
            }

            Event::DeselectRouteInTab { route_id } => {
                Self::reduce_route_tabs(model, |tabs| {
                    route_tabs::deselect_route(tabs, &route_id)
                });
            }

            Event::FlipLadderDirection { route_id } => {
                Self::reduce_route_tabs(model, |tabs| {
                    route_tabs::flip_ladder_direction(tabs, &route_id)
                });
            }

            Event::ToggleLadderCrowding { route_id } => {
                Self::reduce_route_tabs(model, |tabs| {
                    route_tabs::toggle_ladder_crowding(tabs, &route_id)
                });
            }

            Event::CreatePreset { uuid, name } => {
                Self::reduce_route_tabs(model, |tabs| {
                    route_tabs::create_preset(tabs, uuid, &name)
                });
            }

            Event::InstantiatePreset { uuid } => {
                Self::reduce_route_tabs(model, |tabs| {
                    route_tabs::instantiate_preset(tabs, uuid)
                });
            }

            Event::SavePreset { uuid } => {
                Self::reduce_route_tabs(model, |tabs| route_tabs::save_preset(tabs, uuid));
            }

            Event::DeletePreset { uuid } => {
                Self::reduce_route_tabs(model, |tabs| route_tabs::delete_preset(tabs, uuid));
            }

            Event::StartingRouteTabsPush => {
                let budget = model.config.push_retries;
                if let Some((payload, retries)) = model.push.start(budget) {
                    Self::send_route_tabs(payload, retries, caps);
                }
            }

            Event::RouteTabsPushComplete => {
                model.push.complete();
            }

            Event::RetryRouteTabsPushIfNotOutdated {
                route_tabs,
                retries_left,
            } => {
                model.push.retry_if_not_outdated(route_tabs, retries_left);
            }

            Event::OpenSwingsView => model.view.open_view(OpenView::Swings),
            Event::OpenLateView => model.view.open_view(OpenView::Late),
            Event::OpenNotificationDrawer => {
                model.view.open_view(OpenView::NotificationDrawer);
            }
            Event::CloseView => model.view.close_view(),
            Event::ReturnToPreviousView => model.view.return_to_previous_view(),

            Event::SelectVehicle { vehicle } => {
                model.view.select_vehicle(vehicle.map(|v| *v));
            }

            Event::SelectVehicleFromNotification { vehicle } => {
                if let Some(route_id) = vehicle.route_id().cloned() {
                    Self::reduce_route_tabs(model, |tabs| {
                        route_tabs::select_tab_for_route(tabs, &route_id)
                    });
                }
                model.view.select_vehicle(Some(*vehicle));
            }

            Event::SetCurrentPath { path } => model.view.set_current_path(path),

            Event::SetNotifications {
                notifications,
                is_initial_load,
            } => {
                model.notifications.set(notifications, is_initial_load);
            }

            Event::AddNotification { notification } => {
                model.notifications.add(*notification);
            }

            Event::ExpireNotifications { now } => {
                let expiry_ms = model.config.notification_expiry_ms;
                model.notifications.expire(now, expiry_ms);
            }

            Event::MarkAllNotificationsAsRead => {
                let ids = model.notifications.mark_all_read();
                if !ids.is_empty() {
                    caps.api.put_notification_read_state(
                        crate::notifications::NotificationReadState::Read,
                        ids,
                    );
                }
            }

            Event::ToggleNotificationReadState { id } => {
                if let Some(new_state) = model.notifications.toggle_read(id) {
                    caps.api.put_notification_read_state(new_state, vec![id]);
                }
            }

            Event::HideLatestNotification => model.notifications.hide_latest(),

            Event::TogglePickerContainer => {
                model.picker_container_is_visible = !model.picker_container_is_visible;
            }

            Event::SelectShuttleRoute { route_id } => {
                if !model.selected_shuttle_route_ids.contains(&route_id) {
                    model.selected_shuttle_route_ids.push(route_id);
                }
            }

            Event::DeselectShuttleRoute { route_id } => {
                model.selected_shuttle_route_ids.retain(|r| r != &route_id);
            }

            Event::SaveSearchQuery { query } => Self::save_search_query(model, &query),
        }

        if !skip_snapshot_save {
            Self::persist_snapshot_if_changed(&snapshot_before, model, caps);
        }
        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        let open_tabs = route_tabs::open_tabs_in_order(&model.route_tabs)
            .into_iter()
            .map(|tab| TabSummary {
                uuid: tab.uuid,
                ordering: tab.placement.ordering().unwrap_or(0),
                preset_name: tab.preset_name.clone(),
                selected_route_ids: tab.selected_route_ids.clone(),
                is_current_tab: tab.is_current_tab,
                is_edited_preset: tab.is_edited_preset(),
            })
            .collect();

        ViewModel {
            current_path: model.view.current_path,
            open_tabs,
            page: model.view.current().clone(),
            notifications: model.notifications.notifications.clone(),
            unread_count: model.notifications.unread_count(),
            show_latest_notification: model.notifications.show_latest,
            route_tabs_to_push: model.push.to_push.clone(),
            push_in_progress: model.push.in_progress,
            needs_push: model.push.needs_push(),
            picker_container_is_visible: model.picker_container_is_visible,
            selected_shuttle_route_ids: model.selected_shuttle_route_ids.clone(),
        }
    }
}
