//! Notification lifecycle through the full app, including the
//! fire-and-forget read-state writes and the startup snapshot load.

use crux_core::testing::AppTester;

use dispatch_core::capabilities::{ApiOperation, StorageOperation, StorageOutput};
use dispatch_core::model::{RouteId, UnixTimeMs};
use dispatch_core::notifications::{
    Notification, NotificationId, NotificationReadState, NotificationReason,
    ReceivedNotifications,
};
use dispatch_core::view::OpenView;
use dispatch_core::{App, Effect, Event, Model, DEFAULT_NOTIFICATION_EXPIRY_MS};

fn notification(id: u64, created_at: u64, state: NotificationReadState) -> Notification {
    Notification {
        id: NotificationId(id),
        reason: NotificationReason::Diverted,
        route_ids: vec![RouteId::new("66")],
        run_ids: vec![],
        trip_ids: vec![],
        created_at: UnixTimeMs(created_at),
        state,
    }
}

fn read_state_puts(effects: &[Effect]) -> Vec<(NotificationReadState, Vec<NotificationId>)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Api(request) => match &request.operation {
                ApiOperation::PutNotificationReadState { new_state, ids } => {
                    Some((*new_state, ids.clone()))
                }
                ApiOperation::PushRouteTabs { .. } => None,
            },
            _ => None,
        })
        .collect()
}

#[test]
fn initial_snapshot_surfaces_the_banner_only_for_an_unread_head() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let received = ReceivedNotifications::Initial(vec![
        notification(2, 2_000, NotificationReadState::Unread),
        notification(1, 1_000, NotificationReadState::Read),
    ]);
    app.update(Event::from(received), &mut model);

    assert_eq!(model.notifications.notifications.len(), 2);
    assert!(model.notifications.show_latest);

    // A later session whose newest entry was already read stays quiet.
    let received = ReceivedNotifications::Initial(vec![notification(
        3,
        3_000,
        NotificationReadState::Read,
    )]);
    app.update(Event::HideLatestNotification, &mut model);
    app.update(Event::from(received), &mut model);
    assert!(!model.notifications.show_latest);
}

#[test]
fn live_arrivals_prepend_and_can_be_dismissed() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::from(ReceivedNotifications::New(notification(
            7,
            7_000,
            NotificationReadState::Unread,
        ))),
        &mut model,
    );
    assert_eq!(
        model.notifications.notifications[0].id,
        NotificationId(7)
    );
    assert!(model.notifications.show_latest);

    app.update(Event::HideLatestNotification, &mut model);
    assert!(!model.notifications.show_latest);
    assert_eq!(model.notifications.notifications.len(), 1);
}

#[test]
fn the_expiry_sweep_drops_only_stale_notifications() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let now = UnixTimeMs(DEFAULT_NOTIFICATION_EXPIRY_MS * 3);
    app.update(
        Event::SetNotifications {
            notifications: vec![
                notification(
                    2,
                    now.0 - DEFAULT_NOTIFICATION_EXPIRY_MS + 60_000,
                    NotificationReadState::Unread,
                ),
                notification(
                    1,
                    now.0 - DEFAULT_NOTIFICATION_EXPIRY_MS - 1,
                    NotificationReadState::Unread,
                ),
            ],
            is_initial_load: true,
        },
        &mut model,
    );

    app.update(Event::ExpireNotifications { now }, &mut model);

    let ids: Vec<u64> = model
        .notifications
        .notifications
        .iter()
        .map(|n| n.id.0)
        .collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn mark_all_as_read_fires_one_put_with_the_changed_ids() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::SetNotifications {
            notifications: vec![
                notification(2, 2_000, NotificationReadState::Unread),
                notification(1, 1_000, NotificationReadState::Read),
            ],
            is_initial_load: true,
        },
        &mut model,
    );

    let update = app.update(Event::MarkAllNotificationsAsRead, &mut model);
    let puts = read_state_puts(&update.effects);
    assert_eq!(
        puts,
        vec![(NotificationReadState::Read, vec![NotificationId(2)])]
    );
    assert_eq!(model.notifications.unread_count(), 0);

    // Nothing left unread: no write at all.
    let update = app.update(Event::MarkAllNotificationsAsRead, &mut model);
    assert!(read_state_puts(&update.effects).is_empty());
}

#[test]
fn toggling_read_state_is_optimistic_and_fire_and_forget() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::SetNotifications {
            notifications: vec![notification(5, 5_000, NotificationReadState::Unread)],
            is_initial_load: true,
        },
        &mut model,
    );

    let update = app.update(
        Event::ToggleNotificationReadState {
            id: NotificationId(5),
        },
        &mut model,
    );

    // The local flip happened before any network outcome exists.
    assert_eq!(
        model.notifications.notifications[0].state,
        NotificationReadState::Read
    );
    let puts = read_state_puts(&update.effects);
    assert_eq!(
        puts,
        vec![(NotificationReadState::Read, vec![NotificationId(5)])]
    );

    // Unknown ids are a quiet no-op.
    let update = app.update(
        Event::ToggleNotificationReadState {
            id: NotificationId(99),
        },
        &mut model,
    );
    assert!(read_state_puts(&update.effects).is_empty());
}

#[test]
fn startup_reads_the_snapshot_and_restores_it() {
    let app = AppTester::<App, Effect>::default();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);
    let mut reads: Vec<Effect> = update
        .effects
        .into_iter()
        .filter(|effect| {
            matches!(
                effect,
                Effect::Storage(request)
                    if matches!(request.operation, StorageOperation::Read { .. })
            )
        })
        .collect();
    assert_eq!(reads.len(), 1, "startup issues a snapshot read");
    let Effect::Storage(read) = &mut reads[0] else {
        unreachable!();
    };

    let stored = br#"{"openView": "Swings", "pickerContainerIsVisible": false}"#.to_vec();
    let resolved = app
        .resolve(read, Ok(StorageOutput::Value(Some(stored))))
        .expect("resolves");
    for event in resolved.events {
        app.update(event, &mut model);
    }

    assert_eq!(model.view.current().open_view, OpenView::Swings);
    assert!(!model.picker_container_is_visible);
}
