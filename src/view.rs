//! Per-page overlay navigation. Each page context owns an isolated slot of
//! view state, so switching pages never clobbers a view left open elsewhere.
//! History is deliberately one level deep: a single previous view is
//! remembered and consumed on return.

use serde::{Deserialize, Serialize};

use crate::model::VehicleOrGhost;

/// Top-level page contexts. Closed set; routing itself lives in the shell.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PagePath {
    #[default]
    Ladders,
    ShuttleMap,
    Search,
    Settings,
}

impl PagePath {
    pub const ALL: [Self; 4] = [Self::Ladders, Self::ShuttleMap, Self::Search, Self::Settings];
}

/// The overlay panel currently open on a page.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OpenView {
    #[default]
    None,
    Swings,
    Late,
    NotificationDrawer,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct PageViewState {
    pub open_view: OpenView,
    /// Only meaningful while `open_view` is not `None`; consumed by
    /// `return_to_previous_view`.
    pub previous_view: OpenView,
    pub selected_vehicle: Option<VehicleOrGhost>,
}

/// One slot per page, held as named fields so no page can be missing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ViewState {
    pub current_path: PagePath,
    ladders: PageViewState,
    shuttle_map: PageViewState,
    search: PageViewState,
    settings: PageViewState,
}

impl ViewState {
    #[must_use]
    pub fn page(&self, path: PagePath) -> &PageViewState {
        match path {
            PagePath::Ladders => &self.ladders,
            PagePath::ShuttleMap => &self.shuttle_map,
            PagePath::Search => &self.search,
            PagePath::Settings => &self.settings,
        }
    }

    pub fn page_mut(&mut self, path: PagePath) -> &mut PageViewState {
        match path {
            PagePath::Ladders => &mut self.ladders,
            PagePath::ShuttleMap => &mut self.shuttle_map,
            PagePath::Search => &mut self.search,
            PagePath::Settings => &mut self.settings,
        }
    }

    #[must_use]
    pub fn current(&self) -> &PageViewState {
        self.page(self.current_path)
    }

    fn current_mut(&mut self) -> &mut PageViewState {
        self.page_mut(self.current_path)
    }

    /// Opens an overlay on the active page, remembering what it replaced.
    /// Reopening the already-open view is a no-op.
    pub fn open_view(&mut self, view: OpenView) {
        if view == OpenView::None {
            return;
        }
        let slot = self.current_mut();
        if slot.open_view == view {
            return;
        }
        slot.previous_view = slot.open_view;
        slot.open_view = view;
    }

    pub fn close_view(&mut self) {
        let slot = self.current_mut();
        slot.open_view = OpenView::None;
        slot.previous_view = OpenView::None;
    }

    /// Restores the remembered view, then forgets it — depth-1 history.
    /// With nothing remembered the open view stays put.
    pub fn return_to_previous_view(&mut self) {
        let slot = self.current_mut();
        if slot.previous_view != OpenView::None {
            slot.open_view = slot.previous_view;
        }
        slot.previous_view = OpenView::None;
        slot.selected_vehicle = None;
    }

    /// Selecting a vehicle dismisses any open overlay (remembering it) and
    /// records the selection on the active page's slot.
    pub fn select_vehicle(&mut self, vehicle: Option<VehicleOrGhost>) {
        let slot = self.current_mut();
        if slot.open_view != OpenView::None {
            slot.previous_view = slot.open_view;
        }
        slot.open_view = OpenView::None;
        slot.selected_vehicle = vehicle;
    }

    /// Activates a page, resetting that page's overlay state. The vehicle
    /// selection is per-slot and survives; other pages are untouched.
    pub fn set_current_path(&mut self, path: PagePath) {
        self.current_path = path;
        let slot = self.current_mut();
        slot.open_view = OpenView::None;
        slot.previous_view = OpenView::None;
    }
}
