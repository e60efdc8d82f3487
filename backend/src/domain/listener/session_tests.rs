//! Tests for the notification listener lifecycle.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;

use super::*;
use crate::domain::listener::ToastBus;
use crate::domain::ports::{
    ChangeSubscription, FixtureSystemNotifier, FixtureTonePlayer, MockChangeFeed,
    MockNotificationContext,
};
use crate::domain::test_fixtures::{client, open_request};
use crate::domain::{NewNotification, NotificationId, Requester, SearchArea};

struct Rig {
    sender: broadcast::Sender<Notification>,
    toasts: ToastBus,
    listener: NotificationListener,
}

fn rig(context: MockNotificationContext) -> Rig {
    let (sender, _) = broadcast::channel(16);
    let mut feed = MockChangeFeed::new();
    let feed_sender = sender.clone();
    feed.expect_subscribe()
        .returning(move || ChangeSubscription::new(feed_sender.subscribe()));
    let toasts = ToastBus::new();
    let dispatcher = AlertDispatcher::new(
        Arc::new(FixtureTonePlayer),
        Arc::new(FixtureSystemNotifier),
        toasts.clone(),
    );
    let listener = NotificationListener::new(Arc::new(feed), Arc::new(context), dispatcher);
    Rig {
        sender,
        toasts,
        listener,
    }
}

fn row(vendor: ProfileId, request: crate::domain::RequestId) -> Notification {
    Notification::from_new(
        NotificationId::random(),
        NewNotification::to_vendor(vendor, request),
        Utc::now(),
    )
}

fn context_for(request: crate::domain::PartRequest) -> MockNotificationContext {
    let asha = client("Asha");
    let mut context = MockNotificationContext::new();
    context
        .expect_request()
        .returning(move |_| Ok(Some(request.clone())));
    context
        .expect_profile()
        .returning(move |_| Ok(Some(asha.clone())));
    context
}

#[tokio::test]
async fn starts_disconnected() {
    let rig = rig(MockNotificationContext::new());
    assert_eq!(rig.listener.state(), ListenerState::Disconnected);
    assert_eq!(rig.listener.user(), None);
}

#[tokio::test]
async fn addressed_rows_become_toasts() {
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::City);
    let request_id = request.id;
    let rig = rig(context_for(request));
    let me = ProfileId::random();
    let mut toasts = rig.toasts.subscribe();

    rig.listener.attach(me);
    assert_eq!(rig.listener.state(), ListenerState::Connected);
    rig.sender
        .send(row(ProfileId::random(), request_id))
        .expect("listener subscribed");
    rig.sender.send(row(me, request_id)).expect("listener subscribed");

    let shown = tokio::time::timeout(Duration::from_secs(1), toasts.changed())
        .await
        .expect("toast raised in time")
        .expect("bus alive");
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "New Request Received");
    assert_eq!(shown[0].message.as_deref(), Some("Asha requested Brake pads"));
}

#[tokio::test]
async fn changing_identity_resubscribes() {
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::City);
    let request_id = request.id;
    let rig = rig(context_for(request));
    let (old, new) = (ProfileId::random(), ProfileId::random());
    let mut toasts = rig.toasts.subscribe();

    rig.listener.attach(old);
    rig.listener.attach(new);
    assert_eq!(rig.listener.user(), Some(new));

    rig.sender.send(row(old, request_id)).expect("subscribed");
    rig.sender.send(row(new, request_id)).expect("subscribed");
    let shown = tokio::time::timeout(Duration::from_secs(1), toasts.changed())
        .await
        .expect("toast raised in time")
        .expect("bus alive");
    assert_eq!(shown.len(), 1);
}

#[tokio::test]
async fn reattaching_the_same_identity_keeps_the_subscription() {
    let mut feed = MockChangeFeed::new();
    let (sender, _) = broadcast::channel::<Notification>(4);
    feed.expect_subscribe()
        .times(1)
        .returning(move || ChangeSubscription::new(sender.subscribe()));
    let listener = NotificationListener::new(
        Arc::new(feed),
        Arc::new(MockNotificationContext::new()),
        AlertDispatcher::new(
            Arc::new(FixtureTonePlayer),
            Arc::new(FixtureSystemNotifier),
            ToastBus::new(),
        ),
    );
    let me = ProfileId::random();

    listener.attach(me);
    listener.attach(me);

    assert_eq!(listener.state(), ListenerState::Connected);
}

#[tokio::test]
async fn detach_returns_to_disconnected() {
    let rig = rig(MockNotificationContext::new());
    rig.listener.attach(ProfileId::random());

    rig.listener.detach();

    assert_eq!(rig.listener.state(), ListenerState::Disconnected);
    assert_eq!(rig.listener.user(), None);
}

#[tokio::test]
async fn closed_feed_disconnects() {
    let (sender, receiver) = broadcast::channel::<Notification>(4);
    let mut feed = MockChangeFeed::new();
    feed.expect_subscribe()
        .return_once(move || ChangeSubscription::new(receiver));
    let listener = NotificationListener::new(
        Arc::new(feed),
        Arc::new(MockNotificationContext::new()),
        AlertDispatcher::new(
            Arc::new(FixtureTonePlayer),
            Arc::new(FixtureSystemNotifier),
            ToastBus::new(),
        ),
    );
    let mut state = listener.watch_state();
    listener.attach(ProfileId::random());
    drop(sender);

    let settled = tokio::time::timeout(
        Duration::from_secs(1),
        state.wait_for(|s| *s == ListenerState::Disconnected),
    )
    .await
    .expect("disconnect observed in time")
    .map(|s| *s);

    assert_eq!(settled.ok(), Some(ListenerState::Disconnected));
}
