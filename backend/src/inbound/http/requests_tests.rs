//! Tests for part request handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockMatchPreviewQuery, MockPartRequestCommand, MockRequestHistoryQuery,
    MockVendorRequestFeed,
};
use crate::domain::test_fixtures::{fixed_time, open_request, response};
use crate::domain::{
    Error, MatchCounts, ProfileId, RequestId, RequestStatus, Requester, RespondedVendor,
};
use crate::inbound::http::test_utils::{ports_for, sign_in, test_app};

fn form_json() -> Value {
    json!({
        "category": "Brakes",
        "partName": "Brake pads",
        "description": "Front pads for a 2015 Swift",
        "area": { "kind": "radius", "km": 10.0 },
        "location": { "latitude": 19.076, "longitude": 72.8777 },
        "vendorPreference": "authorised"
    })
}

#[actix_web::test]
async fn create_passes_the_draft_and_reports_the_fanout() {
    let caller = ProfileId::random();
    let mut requests = MockPartRequestCommand::new();
    requests
        .expect_create_request()
        .withf(move |who, draft| {
            *who == caller
                && draft.part_name == "Brake pads"
                && draft.area == SearchArea::Radius { km: 10.0 }
                && draft.vendor_preference == VendorPreference::Authorised
                && draft.location.is_some()
        })
        .times(1)
        .returning(move |_, _| {
            Ok(CreatedRequest {
                request: open_request(Requester::Client(caller), SearchArea::Radius { km: 10.0 }),
                fanout: FanoutReport {
                    targeted: 3,
                    inserted: 3,
                },
            })
        });
    let mut ports = ports_for(caller);
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/requests")
            .cookie(cookie)
            .set_json(form_json())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: RequestOutcome = actix_test::read_body_json(res).await;
    assert_eq!(body.fanout.targeted, 3);
    assert_eq!(body.request.requester, Requester::Client(caller));
}

#[actix_web::test]
async fn create_requires_a_session() {
    let mut requests = MockPartRequestCommand::new();
    requests.expect_create_request().never();
    let mut ports = ports_for(ProfileId::random());
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/requests")
            .set_json(form_json())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(MatchCounts { all: 2, authorised: 0, local: 2 }, "authorised", true)]
#[case(MatchCounts { all: 2, authorised: 1, local: 2 }, "authorised", false)]
#[case(MatchCounts { all: 0, authorised: 0, local: 0 }, "all", true)]
#[actix_web::test]
async fn preview_flags_requests_that_reach_nobody(
    #[case] counts: MatchCounts,
    #[case] preference: &str,
    #[case] confirm: bool,
) {
    let mut preview = MockMatchPreviewQuery::new();
    preview
        .expect_preview()
        .withf(|_, scope| *scope == SearchScope::City("Mumbai".into()))
        .return_const(MatchPreview::Known { counts });
    let mut ports = ports_for(ProfileId::random());
    ports.preview = Arc::new(preview);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/requests/preview")
            .cookie(cookie)
            .set_json(json!({
                "area": { "kind": "city" },
                "areaCity": "Mumbai",
                "vendorPreference": preference
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["state"], "known");
    assert_eq!(body["counts"]["all"], json!(counts.all));
    assert_eq!(body["requiresConfirmation"], json!(confirm));
}

#[actix_web::test]
async fn unknown_preview_never_asks_for_confirmation() {
    let app = actix_test::init_service(test_app(ports_for(ProfileId::random()))).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/requests/preview")
            .cookie(cookie)
            .set_json(json!({ "area": { "kind": "country" } }))
            .to_request(),
    )
    .await;

    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "state": "unknown", "requiresConfirmation": false }));
}

#[actix_web::test]
async fn close_returns_the_closed_request() {
    let caller = ProfileId::random();
    let mut closed = open_request(Requester::Client(caller), SearchArea::Country);
    let id = closed.id;
    closed.status = RequestStatus::Closed;
    closed.closed_at = Some(fixed_time());
    let mut requests = MockPartRequestCommand::new();
    requests
        .expect_close_request()
        .withf(move |who, request| *who == caller && *request == id)
        .times(1)
        .return_once(move |_, _| {
            Ok(ClosedRequest {
                request: closed,
                fanout: FanoutReport {
                    targeted: 1,
                    inserted: 1,
                },
            })
        });
    let mut ports = ports_for(caller);
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/requests/{id}/close"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: RequestOutcome = actix_test::read_body_json(res).await;
    assert_eq!(body.request.status, RequestStatus::Closed);
}

#[rstest]
#[case(Error::conflict("request is already closed"), StatusCode::CONFLICT)]
#[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("request not found"), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn close_surfaces_domain_failures(#[case] error: Error, #[case] status: StatusCode) {
    let mut requests = MockPartRequestCommand::new();
    requests
        .expect_close_request()
        .return_once(move |_, _| Err(error));
    let mut ports = ports_for(ProfileId::random());
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/requests/{}/close", RequestId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
}

#[actix_web::test]
async fn malformed_request_ids_are_rejected() {
    let mut requests = MockPartRequestCommand::new();
    requests.expect_close_request().never();
    let mut ports = ports_for(ProfileId::random());
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/requests/not-a-uuid/close")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn respond_records_the_status() {
    let vendor = ProfileId::random();
    let id = RequestId::random();
    let mut requests = MockPartRequestCommand::new();
    requests
        .expect_respond()
        .withf(move |who, request, status| {
            *who == vendor && *request == id && *status == ResponseStatus::Accepted
        })
        .times(1)
        .returning(move |_, request, status| Ok(response(*request, vendor, status)));
    let mut ports = ports_for(vendor);
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/requests/{id}/response"))
            .cookie(cookie)
            .set_json(json!({ "status": "accepted" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: PartResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.status, ResponseStatus::Accepted);
    assert_eq!(body.vendor_id, vendor);
}

#[actix_web::test]
async fn feed_lists_requests_for_the_vendor() {
    let vendor = ProfileId::random();
    let mut feed = MockVendorRequestFeed::new();
    feed.expect_feed()
        .withf(move |who| *who == vendor)
        .times(1)
        .returning(|_| {
            Ok(vec![open_request(
                Requester::Client(ProfileId::random()),
                SearchArea::Country,
            )])
        });
    let mut ports = ports_for(vendor);
    ports.feed = Arc::new(feed);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/vendor/feed")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Vec<PartRequest> = actix_test::read_body_json(res).await;
    assert_eq!(body.len(), 1);
}

#[actix_web::test]
async fn my_requests_lists_the_callers_history() {
    let me = ProfileId::random();
    let vendor = ProfileId::random();
    let mut history = MockRequestHistoryQuery::new();
    history
        .expect_my_requests()
        .withf(move |who| *who == me)
        .times(1)
        .returning(move |_| {
            let request = open_request(Requester::Client(me), SearchArea::Country);
            let accepted = response(request.id, vendor, ResponseStatus::Accepted);
            Ok(vec![RequestHistoryEntry {
                request,
                responses: vec![RespondedVendor {
                    response: accepted,
                    vendor: None,
                }],
            }])
        });
    let mut ports = ports_for(me);
    ports.history = Arc::new(history);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/requests/mine")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let entry = &body[0];
    assert_eq!(entry["partName"], "Brake pads");
    assert_eq!(entry["responses"][0]["status"], "accepted");
    assert_eq!(entry["responses"][0]["vendorId"], vendor.to_string());
}

#[actix_web::test]
async fn my_requests_requires_a_session() {
    let mut history = MockRequestHistoryQuery::new();
    history.expect_my_requests().never();
    let mut ports = ports_for(ProfileId::random());
    ports.history = Arc::new(history);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/requests/mine").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn image_upload_forwards_bytes_and_type() {
    let mut requests = MockPartRequestCommand::new();
    requests
        .expect_upload_request_image()
        .withf(|_, image| {
            image.file_name == "pads.png"
                && image.content_type == "image/png"
                && image.bytes == [1, 2, 3]
        })
        .times(1)
        .returning(|_, _| Ok("https://cdn.example/requests/pads.png".to_owned()));
    let mut ports = ports_for(ProfileId::random());
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/request-images?fileName=pads.png")
            .cookie(cookie)
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(vec![1_u8, 2, 3])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: UploadedImage = actix_test::read_body_json(res).await;
    assert_eq!(body.url, "https://cdn.example/requests/pads.png");
}

#[actix_web::test]
async fn image_upload_needs_a_file_name() {
    let mut requests = MockPartRequestCommand::new();
    requests.expect_upload_request_image().never();
    let mut ports = ports_for(ProfileId::random());
    ports.requests = Arc::new(requests);
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/request-images")
            .cookie(cookie)
            .insert_header((header::CONTENT_TYPE, "image/png"))
            .set_payload(vec![1_u8])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "fileName");
}
