use serde::{Deserialize, Serialize};
use std::fmt;

use crate::notifications::NotificationsState;
use crate::push::PushState;
use crate::route_tabs::RouteTab;
use crate::view::ViewState;
use crate::{DEFAULT_NOTIFICATION_EXPIRY_MS, DEFAULT_PUSH_RETRIES};

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

typed_id!(RouteId);
typed_id!(RunId);
typed_id!(TripId);
typed_id!(VehicleId);

/// Explicit timestamp unit: milliseconds since the Unix epoch.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UnixTimeMs(pub u64);

impl UnixTimeMs {
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn elapsed_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    #[must_use]
    pub fn add_millis(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

// --- Vehicles ---

/// A tracked revenue vehicle as delivered by the realtime feed. Only the
/// attributes the state core consults are modeled; the shell renders from its
/// own richer feed types.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    pub label: String,
    pub run_id: Option<RunId>,
    pub route_id: Option<RouteId>,
}

/// A scheduled trip with no vehicle currently transmitting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Ghost {
    pub id: VehicleId,
    pub route_id: Option<RouteId>,
    pub trip_id: Option<TripId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum VehicleOrGhost {
    Vehicle(Vehicle),
    Ghost(Ghost),
}

impl VehicleOrGhost {
    #[must_use]
    pub fn route_id(&self) -> Option<&RouteId> {
        match self {
            Self::Vehicle(v) => v.route_id.as_ref(),
            Self::Ghost(g) => g.route_id.as_ref(),
        }
    }
}

/// A search the user chose to keep, newest first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SavedQuery {
    pub text: String,
}

// --- Policy configuration ---

/// Tunable policy constants. The defaults mirror the reference deployment;
/// shells may override them at startup.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Retries after the initial attempt for a failed route-tab push.
    pub push_retries: u32,
    /// Age at which a notification is dropped by the expiry sweep.
    pub notification_expiry_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            push_retries: DEFAULT_PUSH_RETRIES,
            notification_expiry_ms: DEFAULT_NOTIFICATION_EXPIRY_MS,
        }
    }
}

// --- Root state ---

/// The whole application state tree. Replaced atomically per dispatched
/// event; nothing outside `update` mutates it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Model {
    pub route_tabs: Vec<RouteTab>,
    pub push: PushState,
    pub view: ViewState,
    pub notifications: NotificationsState,

    // Peripheral UI state that participates in the persisted snapshot.
    pub picker_container_is_visible: bool,
    pub selected_shuttle_route_ids: Vec<RouteId>,
    pub search_saved_queries: Vec<SavedQuery>,

    pub config: Config,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            route_tabs: Vec::new(),
            push: PushState::default(),
            view: ViewState::default(),
            notifications: NotificationsState::default(),
            // The route picker starts open on a fresh session.
            picker_container_is_visible: true,
            selected_shuttle_route_ids: Vec::new(),
            search_saved_queries: Vec::new(),
            config: Config::default(),
        }
    }
}
