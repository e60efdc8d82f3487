//! Tests for notification fan-out.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockNotificationRepository, MockProfileRepository, MockResponseRepository,
    NotificationRepositoryError, ProfileRepositoryError, ResponseRepositoryError,
};
use crate::domain::test_fixtures::{MUMBAI, client, open_request, vendor};
use crate::domain::{Notification, NotificationId, Profile, SearchArea};

type Notifier =
    FanoutNotifier<MockProfileRepository, MockResponseRepository, MockNotificationRepository>;

fn notifier(
    profiles: MockProfileRepository,
    responses: MockResponseRepository,
    notifications: MockNotificationRepository,
) -> Notifier {
    FanoutNotifier::new(Arc::new(profiles), Arc::new(responses), Arc::new(notifications))
}

fn profiles_returning(vendors: Vec<Profile>) -> MockProfileRepository {
    let mut repo = MockProfileRepository::new();
    repo.expect_list_vendors()
        .times(1)
        .return_once(move || Ok(vendors));
    repo
}

fn echoing_notifications() -> MockNotificationRepository {
    let mut repo = MockNotificationRepository::new();
    repo.expect_insert_many().times(1).returning(|rows| {
        Ok(rows
            .iter()
            .map(|row| Notification::from_new(NotificationId::random(), *row, Utc::now()))
            .collect())
    });
    repo
}

/// Offsets north of Mumbai giving roughly 2, 8 and 15 km.
fn mumbai_vendors() -> Vec<Profile> {
    [0.018, 0.072, 0.135]
        .into_iter()
        .map(|offset| vendor("Local", Some((MUMBAI.0 + offset, MUMBAI.1)), false))
        .collect()
}

#[tokio::test]
async fn creation_notifies_each_vendor_in_range_once() {
    let vendors = mumbai_vendors();
    let expected: Vec<ProfileId> = vendors.iter().take(2).map(|v| v.id).collect();
    let requester = client("Asha");
    let request = open_request(Requester::Client(requester.id), SearchArea::Radius { km: 10.0 });

    let mut notifications = MockNotificationRepository::new();
    let request_id = request.id;
    notifications
        .expect_insert_many()
        .times(1)
        .withf(move |rows| {
            rows.len() == 2
                && rows.iter().all(|r| {
                    r.client_id.is_none() && r.request_id == request_id && r.responder_id.is_none()
                })
                && rows
                    .iter()
                    .filter_map(|r| r.vendor_id)
                    .eq(expected.iter().copied())
        })
        .returning(|rows| {
            Ok(rows
                .iter()
                .map(|row| Notification::from_new(NotificationId::random(), *row, Utc::now()))
                .collect())
        });

    let report = notifier(
        profiles_returning(vendors),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_request_created(&request)
    .await;

    assert_eq!(
        report,
        FanoutReport {
            targeted: 2,
            inserted: 2
        }
    );
}

#[tokio::test]
async fn vendor_requester_is_not_notified_of_its_own_request() {
    let me = vendor("Me", Some(MUMBAI), false);
    let other = vendor("Other", Some(MUMBAI), false);
    let other_id = other.id;
    let request = open_request(Requester::Vendor(me.id), SearchArea::Country);

    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_insert_many()
        .times(1)
        .withf(move |rows| rows.len() == 1 && rows[0].vendor_id == Some(other_id))
        .returning(|rows| {
            Ok(rows
                .iter()
                .map(|row| Notification::from_new(NotificationId::random(), *row, Utc::now()))
                .collect())
        });

    let report = notifier(
        profiles_returning(vec![me, other]),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_request_created(&request)
    .await;

    assert_eq!(report.inserted, 1);
}

#[tokio::test]
async fn empty_match_inserts_nothing() {
    let request = open_request(
        Requester::Client(ProfileId::random()),
        SearchArea::Radius { km: 5.0 },
    );
    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert_many().never();

    let report = notifier(
        profiles_returning(vec![vendor("Far", Some((28.6, 77.2)), true)]),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_request_created(&request)
    .await;

    assert_eq!(report, FanoutReport::default());
}

#[tokio::test]
async fn population_failure_is_swallowed() {
    let mut profiles = MockProfileRepository::new();
    profiles
        .expect_list_vendors()
        .times(1)
        .return_once(|| Err(ProfileRepositoryError::connection("refused")));
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::Country);

    let report = notifier(
        profiles,
        MockResponseRepository::new(),
        MockNotificationRepository::new(),
    )
    .notify_request_created(&request)
    .await;

    assert_eq!(report, FanoutReport::default());
}

#[tokio::test]
async fn insert_failure_reports_zero_inserted() {
    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_insert_many()
        .times(1)
        .returning(|_| Err(NotificationRepositoryError::query("constraint violated")));
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::Country);

    let report = notifier(
        profiles_returning(vec![vendor("Near", Some(MUMBAI), true)]),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_request_created(&request)
    .await;

    assert_eq!(
        report,
        FanoutReport {
            targeted: 1,
            inserted: 0
        }
    );
}

#[rstest]
#[case(vec![], 0)]
#[case(vec![ProfileId::random()], 1)]
#[tokio::test]
async fn closure_notifies_accepted_vendors(
    #[case] accepted: Vec<ProfileId>,
    #[case] expected: usize,
) {
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::City);
    let mut responses = MockResponseRepository::new();
    responses
        .expect_accepted_vendors()
        .with(eq(request.id))
        .times(1)
        .return_once(move |_| Ok(accepted));
    let mut notifications = if expected == 0 {
        MockNotificationRepository::new()
    } else {
        echoing_notifications()
    };
    if expected == 0 {
        notifications.expect_insert_many().never();
    }

    let report = notifier(MockProfileRepository::new(), responses, notifications)
        .notify_request_closed(&request)
        .await;

    assert_eq!(report.inserted, expected);
}

#[tokio::test]
async fn closure_survives_response_lookup_failure() {
    let request = open_request(Requester::Client(ProfileId::random()), SearchArea::City);
    let mut responses = MockResponseRepository::new();
    responses
        .expect_accepted_vendors()
        .times(1)
        .return_once(|_| Err(ResponseRepositoryError::connection("refused")));

    let report = notifier(
        MockProfileRepository::new(),
        responses,
        MockNotificationRepository::new(),
    )
    .notify_request_closed(&request)
    .await;

    assert_eq!(report, FanoutReport::default());
}

#[tokio::test]
async fn response_to_client_targets_the_client() {
    let asha = client("Asha");
    let responder = ProfileId::random();
    let request = open_request(Requester::Client(asha.id), SearchArea::City);
    let client_id = asha.id;

    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_insert_many()
        .times(1)
        .withf(move |rows| {
            rows == [NewNotification {
                vendor_id: Some(responder),
                client_id: Some(client_id),
                responder_id: Some(responder),
                request_id: rows[0].request_id,
            }]
        })
        .returning(|rows| {
            Ok(rows
                .iter()
                .map(|row| Notification::from_new(NotificationId::random(), *row, Utc::now()))
                .collect())
        });

    let report = notifier(
        MockProfileRepository::new(),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_response(&request, responder, ResponseStatus::Accepted)
    .await;

    assert_eq!(report.inserted, 1);
}

#[tokio::test]
async fn response_to_vendor_requester_carries_the_responder() {
    let requester = ProfileId::random();
    let responder = ProfileId::random();
    let request = open_request(Requester::Vendor(requester), SearchArea::City);

    let mut notifications = MockNotificationRepository::new();
    notifications
        .expect_insert_many()
        .times(1)
        .withf(move |rows| {
            rows.len() == 1
                && rows[0].vendor_id == Some(requester)
                && rows[0].client_id.is_none()
                && rows[0].responder_id == Some(responder)
        })
        .returning(|rows| {
            Ok(rows
                .iter()
                .map(|row| Notification::from_new(NotificationId::random(), *row, Utc::now()))
                .collect())
        });

    let report = notifier(
        MockProfileRepository::new(),
        MockResponseRepository::new(),
        notifications,
    )
    .notify_response(&request, responder, ResponseStatus::Rejected)
    .await;

    assert_eq!(report.inserted, 1);
}
