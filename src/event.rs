use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{RouteId, UnixTimeMs, VehicleOrGhost};
use crate::notifications::{Notification, NotificationId, ReceivedNotifications};
use crate::route_tabs::RouteTab;
use crate::view::PagePath;

/// The closed action union. Every reducer is total over it: variants a
/// sub-reducer does not recognize reduce to no-ops, never panics.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    Noop,

    // Startup
    AppStarted,
    SnapshotLoaded {
        data: Option<Vec<u8>>,
    },

    // Route tabs
    CreateRouteTab,
    SelectRouteTab {
        uuid: Uuid,
    },
    CloseRouteTab {
        uuid: Uuid,
    },
    SelectRouteInTab {
        route_id: RouteId,
    },
    DeselectRouteInTab {
        route_id: RouteId,
    },
    FlipLadderDirection {
        route_id: RouteId,
    },
    ToggleLadderCrowding {
        route_id: RouteId,
    },
    CreatePreset {
        uuid: Uuid,
        name: String,
    },
    InstantiatePreset {
        uuid: Uuid,
    },
    SavePreset {
        uuid: Uuid,
    },
    DeletePreset {
        uuid: Uuid,
    },

    // Push pipeline (driven by the external push driver and the Api
    // capability's completion callbacks)
    StartingRouteTabsPush,
    RouteTabsPushComplete,
    RetryRouteTabsPushIfNotOutdated {
        route_tabs: Vec<RouteTab>,
        retries_left: u32,
    },

    // View navigation
    OpenSwingsView,
    OpenLateView,
    OpenNotificationDrawer,
    CloseView,
    ReturnToPreviousView,
    SelectVehicle {
        vehicle: Option<Box<VehicleOrGhost>>,
    },
    SelectVehicleFromNotification {
        vehicle: Box<VehicleOrGhost>,
    },
    SetCurrentPath {
        path: PagePath,
    },

    // Notifications
    SetNotifications {
        notifications: Vec<Notification>,
        is_initial_load: bool,
    },
    AddNotification {
        notification: Box<Notification>,
    },
    ExpireNotifications {
        now: UnixTimeMs,
    },
    MarkAllNotificationsAsRead,
    ToggleNotificationReadState {
        id: NotificationId,
    },
    HideLatestNotification,

    // Peripheral persisted UI state
    TogglePickerContainer,
    SelectShuttleRoute {
        route_id: RouteId,
    },
    DeselectShuttleRoute {
        route_id: RouteId,
    },
    SaveSearchQuery {
        query: String,
    },
}

/// The notification transport maps straight onto the two lifecycle events.
impl From<ReceivedNotifications> for Event {
    fn from(received: ReceivedNotifications) -> Self {
        match received {
            ReceivedNotifications::Initial(notifications) => Self::SetNotifications {
                notifications,
                is_initial_load: true,
            },
            ReceivedNotifications::New(notification) => Self::AddNotification {
                notification: Box::new(notification),
            },
        }
    }
}
