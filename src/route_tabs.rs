//! Route tabs: saved and transient dashboard layouts, their CRUD and preset
//! lifecycle. Every operation here is total — unknown uuids and missing
//! current tabs reduce to no-ops — and reports whether it made a change that
//! the push pipeline must eventually persist.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::model::RouteId;

/// Where a tab sits relative to the open tab strip.
///
/// `Open(n)` is a position among open tabs; orderings are unique but not
/// contiguous. `Closed` is a stored-but-not-open tab, e.g. a preset that was
/// closed without being deleted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Open(u32),
    Closed,
}

impl Placement {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open(_))
    }

    #[must_use]
    pub const fn ordering(self) -> Option<u32> {
        match self {
            Self::Open(n) => Some(n),
            Self::Closed => None,
        }
    }
}

/// Direction a route ladder is drawn in, flipped per route per tab.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LadderDirection {
    #[default]
    ZeroToOne,
    OneToZero,
}

impl LadderDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::ZeroToOne => Self::OneToZero,
            Self::OneToZero => Self::ZeroToOne,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteTab {
    pub uuid: Uuid,
    pub placement: Placement,
    pub preset_name: Option<String>,
    pub selected_route_ids: Vec<RouteId>,
    pub ladder_directions: HashMap<RouteId, LadderDirection>,
    pub ladder_crowding_toggles: HashMap<RouteId, bool>,
    pub is_current_tab: bool,
    /// Set only on an edited copy of a preset, pointing at the original.
    pub save_changes_to_tab_uuid: Option<Uuid>,
}

impl RouteTab {
    #[must_use]
    pub fn new(ordering: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            placement: Placement::Open(ordering),
            preset_name: None,
            selected_route_ids: Vec::new(),
            ladder_directions: HashMap::new(),
            ladder_crowding_toggles: HashMap::new(),
            is_current_tab: false,
            save_changes_to_tab_uuid: None,
        }
    }

    /// A tab is a preset iff it carries a name.
    #[must_use]
    pub fn is_preset(&self) -> bool {
        self.preset_name.is_some()
    }

    /// An edited preset is a working copy linked back to its original.
    #[must_use]
    pub fn is_edited_preset(&self) -> bool {
        self.save_changes_to_tab_uuid.is_some()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.placement.is_open()
    }

    /// Working copy taking over this preset's place in the tab strip. The
    /// original keeps the stored content; the copy takes placement and
    /// currency and accumulates the edits.
    #[must_use]
    fn fork_edited_copy(&self) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            placement: self.placement,
            preset_name: self.preset_name.clone(),
            selected_route_ids: self.selected_route_ids.clone(),
            ladder_directions: self.ladder_directions.clone(),
            ladder_crowding_toggles: self.ladder_crowding_toggles.clone(),
            is_current_tab: self.is_current_tab,
            save_changes_to_tab_uuid: Some(self.uuid),
        }
    }
}

// --- Pure lookup helpers ---

#[must_use]
pub fn current_tab(tabs: &[RouteTab]) -> Option<&RouteTab> {
    tabs.iter().find(|t| t.is_current_tab)
}

#[must_use]
pub fn find_by_uuid(tabs: &[RouteTab], uuid: Uuid) -> Option<&RouteTab> {
    tabs.iter().find(|t| t.uuid == uuid)
}

/// Open tabs in ascending ordering. Ties cannot occur (orderings are unique)
/// but the sort is stable regardless.
#[must_use]
pub fn open_tabs_in_order(tabs: &[RouteTab]) -> Vec<&RouteTab> {
    let mut open: Vec<&RouteTab> = tabs.iter().filter(|t| t.is_open()).collect();
    open.sort_by_key(|t| t.placement.ordering());
    open
}

fn next_ordering(tabs: &[RouteTab]) -> u32 {
    tabs.iter()
        .filter_map(|t| t.placement.ordering())
        .max()
        .map_or(0, |n| n.saturating_add(1))
}

fn clear_current(tabs: &mut [RouteTab]) {
    for tab in tabs.iter_mut() {
        tab.is_current_tab = false;
    }
}

/// When the current tab disappears, the nearest open tab takes over: first
/// the lowest ordering above the vacated slot, else the highest below it.
fn select_nearest_open(tabs: &mut Vec<RouteTab>, vacated: Option<u32>) {
    let successor = {
        let open = open_tabs_in_order(tabs);
        let after = vacated.and_then(|n| {
            open.iter()
                .find(|t| t.placement.ordering().is_some_and(|o| o > n))
                .map(|t| t.uuid)
        });
        after.or_else(|| open.last().map(|t| t.uuid))
    };
    if let Some(uuid) = successor {
        for tab in tabs.iter_mut() {
            tab.is_current_tab = tab.uuid == uuid;
        }
    }
}

// --- Operations ---
//
// Each returns true iff it changed state in a way that must be persisted.

pub fn create_tab(tabs: &mut Vec<RouteTab>) -> bool {
    let ordering = next_ordering(tabs);
    clear_current(tabs);
    let mut tab = RouteTab::new(ordering);
    tab.is_current_tab = true;
    tabs.push(tab);
    true
}

pub fn select_tab(tabs: &mut [RouteTab], uuid: Uuid) -> bool {
    match find_by_uuid(tabs, uuid) {
        Some(tab) if tab.is_open() && !tab.is_current_tab => {
            for tab in tabs.iter_mut() {
                tab.is_current_tab = tab.uuid == uuid;
            }
            true
        }
        _ => false,
    }
}

pub fn close_tab(tabs: &mut Vec<RouteTab>, uuid: Uuid) -> bool {
    let Some(index) = tabs.iter().position(|t| t.uuid == uuid && t.is_open()) else {
        return false;
    };
    let was_current = tabs[index].is_current_tab;
    let vacated = tabs[index].placement.ordering();

    if tabs[index].is_edited_preset() {
        // Closing a working copy discards its edits; the stored original
        // remains untouched.
        tabs.remove(index);
    } else if tabs[index].is_preset() {
        tabs[index].placement = Placement::Closed;
        tabs[index].is_current_tab = false;
    } else {
        tabs.remove(index);
    }

    if was_current {
        select_nearest_open(tabs, vacated);
    }
    true
}

/// Applies an edit to the current tab. Editing a clean preset first forks a
/// working copy so the stored preset never drifts while being viewed.
/// `changes` must return false when the edit would be a no-op, in which case
/// no fork happens either.
fn edit_current_tab(
    tabs: &mut Vec<RouteTab>,
    changes: impl Fn(&mut RouteTab) -> bool,
) -> bool {
    let Some(index) = tabs.iter().position(|t| t.is_current_tab) else {
        return false;
    };

    // Dry-run against a scratch clone to detect no-op edits before forking.
    let mut scratch = tabs[index].clone();
    if !changes(&mut scratch) {
        return false;
    }

    if tabs[index].is_preset() && !tabs[index].is_edited_preset() {
        let copy = tabs[index].fork_edited_copy();
        tabs[index].placement = Placement::Closed;
        tabs[index].is_current_tab = false;
        tabs.push(copy);
        let last = tabs.len() - 1;
        changes(&mut tabs[last])
    } else {
        changes(&mut tabs[index])
    }
}

pub fn select_route(tabs: &mut Vec<RouteTab>, route_id: &RouteId) -> bool {
    edit_current_tab(tabs, |tab| {
        if tab.selected_route_ids.contains(route_id) {
            false
        } else {
            tab.selected_route_ids.push(route_id.clone());
            true
        }
    })
}

pub fn deselect_route(tabs: &mut Vec<RouteTab>, route_id: &RouteId) -> bool {
    edit_current_tab(tabs, |tab| {
        if tab.selected_route_ids.contains(route_id) {
            tab.selected_route_ids.retain(|r| r != route_id);
            tab.ladder_directions.remove(route_id);
            tab.ladder_crowding_toggles.remove(route_id);
            true
        } else {
            false
        }
    })
}

pub fn flip_ladder_direction(tabs: &mut Vec<RouteTab>, route_id: &RouteId) -> bool {
    edit_current_tab(tabs, |tab| {
        if tab.selected_route_ids.contains(route_id) {
            let direction = tab
                .ladder_directions
                .get(route_id)
                .copied()
                .unwrap_or_default();
            tab.ladder_directions
                .insert(route_id.clone(), direction.flipped());
            true
        } else {
            false
        }
    })
}

pub fn toggle_ladder_crowding(tabs: &mut Vec<RouteTab>, route_id: &RouteId) -> bool {
    edit_current_tab(tabs, |tab| {
        if tab.selected_route_ids.contains(route_id) {
            let enabled = tab
                .ladder_crowding_toggles
                .get(route_id)
                .copied()
                .unwrap_or(false);
            tab.ladder_crowding_toggles.insert(route_id.clone(), !enabled);
            true
        } else {
            false
        }
    })
}

/// Stamps a preset name onto an existing tab; the tab keeps its identity.
pub fn create_preset(tabs: &mut [RouteTab], uuid: Uuid, name: &str) -> bool {
    match tabs.iter_mut().find(|t| t.uuid == uuid) {
        Some(tab) if tab.preset_name.as_deref() != Some(name) => {
            tab.preset_name = Some(name.to_string());
            true
        }
        _ => false,
    }
}

/// Opens a stored preset as the current tab with a fresh ordering. A preset
/// that is already open (or open through its working copy) is selected
/// instead, so a preset never appears twice in the tab strip.
pub fn instantiate_preset(tabs: &mut Vec<RouteTab>, uuid: Uuid) -> bool {
    if let Some(copy) = tabs
        .iter()
        .find(|t| t.save_changes_to_tab_uuid == Some(uuid) && t.is_open())
    {
        let copy_uuid = copy.uuid;
        return select_tab(tabs, copy_uuid);
    }

    let Some(index) = tabs
        .iter()
        .position(|t| t.uuid == uuid && t.is_preset() && !t.is_edited_preset())
    else {
        return false;
    };

    if tabs[index].is_open() {
        return select_tab(tabs, uuid);
    }

    let ordering = next_ordering(tabs);
    clear_current(tabs);
    tabs[index].placement = Placement::Open(ordering);
    tabs[index].is_current_tab = true;
    true
}

/// Merges a working copy back onto its original preset and discards the
/// copy. The original takes over the copy's spot in the tab strip.
pub fn save_preset(tabs: &mut Vec<RouteTab>, uuid: Uuid) -> bool {
    let Some(copy_index) = tabs
        .iter()
        .position(|t| t.uuid == uuid && t.is_edited_preset())
    else {
        return false;
    };
    let Some(original_uuid) = tabs[copy_index].save_changes_to_tab_uuid else {
        return false;
    };
    let Some(original_index) = tabs.iter().position(|t| t.uuid == original_uuid) else {
        return false;
    };

    let copy = tabs.remove(copy_index);
    let original_index = if original_index > copy_index {
        original_index - 1
    } else {
        original_index
    };
    let original = &mut tabs[original_index];
    original.selected_route_ids = copy.selected_route_ids;
    original.ladder_directions = copy.ladder_directions;
    original.ladder_crowding_toggles = copy.ladder_crowding_toggles;
    original.placement = copy.placement;
    original.is_current_tab = copy.is_current_tab;
    true
}

/// Deletes a preset outright, open or not, along with any working copy
/// pointing at it.
pub fn delete_preset(tabs: &mut Vec<RouteTab>, uuid: Uuid) -> bool {
    let targets: Vec<usize> = tabs
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            (t.uuid == uuid && t.is_preset()) || t.save_changes_to_tab_uuid == Some(uuid)
        })
        .map(|(i, _)| i)
        .collect();
    if targets.is_empty() {
        return false;
    }

    let was_current = targets.iter().any(|&i| tabs[i].is_current_tab);
    let vacated = targets
        .iter()
        .filter_map(|&i| tabs[i].placement.ordering())
        .min();

    for index in targets.into_iter().rev() {
        tabs.remove(index);
    }
    if was_current {
        select_nearest_open(tabs, vacated);
    }
    true
}

/// Tab routing for a vehicle surfaced from a notification: keep the current
/// tab when it already shows the vehicle's route; otherwise switch to the
/// first open tab (lowest ordering) containing the route; otherwise leave
/// the tabs alone.
pub fn select_tab_for_route(tabs: &mut [RouteTab], route_id: &RouteId) -> bool {
    if current_tab(tabs).is_some_and(|t| t.selected_route_ids.contains(route_id)) {
        return false;
    }

    let target = open_tabs_in_order(tabs)
        .into_iter()
        .find(|t| t.selected_route_ids.contains(route_id))
        .map(|t| t.uuid);

    match target {
        Some(uuid) => {
            for tab in tabs.iter_mut() {
                tab.is_current_tab = tab.uuid == uuid;
            }
            true
        }
        None => false,
    }
}
