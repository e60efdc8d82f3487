//! Addressing of change-feed rows.

use serde::Serialize;

use crate::domain::{Notification, ProfileId};

/// Which slot of a notification row names the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Addressee {
    /// `vendor_id` is the user and `client_id` is empty.
    Vendor,
    /// `client_id` is the user.
    Client,
}

/// Decide whether `event` is addressed to `user`.
///
/// Every session sees every row, so rows for somebody else yield `None`.
/// The vendor slot is checked first.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use partfinder::domain::{
///     Addressee, NewNotification, Notification, NotificationId, ProfileId, RequestId, classify,
/// };
///
/// let vendor = ProfileId::random();
/// let row = NewNotification::to_vendor(vendor, RequestId::random());
/// let event = Notification::from_new(NotificationId::random(), row, Utc::now());
/// assert_eq!(classify(&event, &vendor), Some(Addressee::Vendor));
/// assert_eq!(classify(&event, &ProfileId::random()), None);
/// ```
pub fn classify(event: &Notification, user: &ProfileId) -> Option<Addressee> {
    if event.vendor_id == Some(*user) && event.client_id.is_none() {
        Some(Addressee::Vendor)
    } else if event.client_id == Some(*user) {
        Some(Addressee::Client)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewNotification, NotificationId, RequestId};
    use chrono::Utc;
    use rstest::rstest;

    fn event(row: NewNotification) -> Notification {
        Notification::from_new(NotificationId::random(), row, Utc::now())
    }

    #[test]
    fn client_rows_are_for_the_client_not_the_responder() {
        let client = ProfileId::random();
        let vendor = ProfileId::random();
        let row = event(NewNotification::to_client(client, vendor, RequestId::random()));

        assert_eq!(classify(&row, &client), Some(Addressee::Client));
        assert_eq!(classify(&row, &vendor), None);
    }

    #[test]
    fn vendor_requester_rows_go_to_the_requester() {
        let requester = ProfileId::random();
        let responder = ProfileId::random();
        let row = event(NewNotification::to_vendor_requester(
            requester,
            responder,
            RequestId::random(),
        ));

        assert_eq!(classify(&row, &requester), Some(Addressee::Vendor));
        assert_eq!(classify(&row, &responder), None);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(ProfileId::random()), None)]
    #[case(None, Some(ProfileId::random()))]
    fn rows_for_others_are_discarded(
        #[case] vendor_id: Option<ProfileId>,
        #[case] client_id: Option<ProfileId>,
    ) {
        let row = event(NewNotification {
            vendor_id,
            client_id,
            responder_id: None,
            request_id: RequestId::random(),
        });

        assert_eq!(classify(&row, &ProfileId::random()), None);
    }
}
