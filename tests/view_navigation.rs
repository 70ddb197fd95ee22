//! Overlay navigation flows across page contexts, driven through the full
//! app: per-page isolation, depth-1 history, and the snapshot write that a
//! view change triggers.

use crux_core::testing::AppTester;

use dispatch_core::capabilities::StorageOperation;
use dispatch_core::model::{RouteId, Vehicle, VehicleId, VehicleOrGhost};
use dispatch_core::route_tabs::RouteTab;
use dispatch_core::view::{OpenView, PagePath};
use dispatch_core::{App, Effect, Event, Model};

fn bus(id: &str, route: &str) -> VehicleOrGhost {
    VehicleOrGhost::Vehicle(Vehicle {
        id: VehicleId::new(id),
        label: id.to_string(),
        run_id: None,
        route_id: Some(RouteId::new(route)),
    })
}

#[test]
fn swings_late_return_restores_swings_exactly_once() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::OpenSwingsView, &mut model);
    app.update(Event::OpenLateView, &mut model);
    assert_eq!(model.view.current().open_view, OpenView::Late);

    app.update(Event::ReturnToPreviousView, &mut model);
    assert_eq!(model.view.current().open_view, OpenView::Swings);

    app.update(Event::ReturnToPreviousView, &mut model);
    assert_eq!(model.view.current().open_view, OpenView::Swings);
}

#[test]
fn a_view_left_open_on_another_page_is_not_clobbered() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::OpenNotificationDrawer, &mut model);
    app.update(
        Event::SetCurrentPath {
            path: PagePath::ShuttleMap,
        },
        &mut model,
    );
    app.update(Event::OpenLateView, &mut model);

    assert_eq!(
        model.view.page(PagePath::Ladders).open_view,
        OpenView::NotificationDrawer
    );
    assert_eq!(
        model.view.page(PagePath::ShuttleMap).open_view,
        OpenView::Late
    );
}

#[test]
fn selecting_a_vehicle_from_a_notification_switches_tab_and_view() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    // Tab 0 shows route 1 and is current; tab 1 shows route 39.
    let mut first = RouteTab::new(0);
    first.is_current_tab = true;
    first.selected_route_ids = vec![RouteId::new("1")];
    let mut second = RouteTab::new(1);
    second.selected_route_ids = vec![RouteId::new("39")];
    model.route_tabs = vec![first, second];

    app.update(Event::OpenNotificationDrawer, &mut model);
    app.update(
        Event::SelectVehicleFromNotification {
            vehicle: Box::new(bus("y1234", "39")),
        },
        &mut model,
    );

    // The open tab showing the notified route became current, the drawer
    // was dismissed into history, and the vehicle landed in the slot.
    assert!(model.route_tabs[1].is_current_tab);
    assert!(!model.route_tabs[0].is_current_tab);
    assert_eq!(model.view.current().open_view, OpenView::None);
    assert_eq!(
        model.view.current().previous_view,
        OpenView::NotificationDrawer
    );
    assert!(model.view.current().selected_vehicle.is_some());

    // The switch is a persistable layout change.
    assert!(model.push.to_push.is_some());
}

#[test]
fn deselecting_a_vehicle_clears_the_slot() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::SelectVehicle {
            vehicle: Some(Box::new(bus("y1234", "1"))),
        },
        &mut model,
    );
    assert!(model.view.current().selected_vehicle.is_some());

    app.update(Event::SelectVehicle { vehicle: None }, &mut model);
    assert!(model.view.current().selected_vehicle.is_none());
}

#[test]
fn view_changes_write_the_snapshot_and_no_ops_do_not() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::OpenSwingsView, &mut model);
    let wrote = update.effects.iter().any(|effect| {
        matches!(
            effect,
            Effect::Storage(request)
                if matches!(request.operation, StorageOperation::Write { .. })
        )
    });
    assert!(wrote, "a view change should persist the snapshot");

    // Reopening the already-open view changes nothing, so nothing is saved.
    let update = app.update(Event::OpenSwingsView, &mut model);
    let wrote = update.effects.iter().any(|effect| {
        matches!(
            effect,
            Effect::Storage(request)
                if matches!(request.operation, StorageOperation::Write { .. })
        )
    });
    assert!(!wrote);
}
