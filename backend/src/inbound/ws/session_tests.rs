//! WebSocket session handler tests.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle, http::header, web};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockGeocoder, MockNotificationContext};
use crate::domain::test_fixtures::{MUMBAI, at, client, open_request};
use crate::domain::{
    NewNotification, Notification, NotificationId, PlaceSuggestion, Requester, SearchArea,
    SignOutBus,
};
use crate::inbound::http::{api_scope, state::HttpState, test_utils::ports_for};
use crate::inbound::ws::{self, OriginPolicy};
use crate::outbound::change_feed::BroadcastChangeFeed;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

struct Rig {
    url: String,
    user: ProfileId,
    feed: BroadcastChangeFeed,
    _server: ServerHandle,
}

fn geocoder() -> MockGeocoder {
    let mut geocoder = MockGeocoder::new();
    geocoder.expect_search().returning(|query| {
        vec![PlaceSuggestion {
            display_name: format!("{query}, Maharashtra, India"),
            location: at(MUMBAI),
            city: Some(query.to_owned()),
            state: Some("Maharashtra".into()),
        }]
    });
    geocoder
}

fn context() -> MockNotificationContext {
    let requester = client("Priya");
    let requester_id = requester.id;
    let mut context = MockNotificationContext::new();
    context.expect_request().returning(move |id| {
        let mut request = open_request(Requester::Client(requester_id), SearchArea::Country);
        request.id = *id;
        Ok(Some(request))
    });
    context
        .expect_profile()
        .returning(move |id| Ok((*id == requester_id).then(|| requester.clone())));
    context.expect_response().returning(|_, _| Ok(None));
    context
}

fn start_server(user: ProfileId, feed: BroadcastChangeFeed) -> (String, Server) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let key = Key::generate();
    let sign_outs = SignOutBus::new();
    let ws_state = WsState::new(
        Arc::new(feed),
        Arc::new(context()),
        Arc::new(geocoder()),
        OriginPolicy::new("partfinder.example"),
    )
    .with_sign_outs(sign_outs.clone());
    let http_state = HttpState::new(ports_for(user)).with_sign_outs(sign_outs);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(ws_state.clone()))
            .app_data(web::Data::new(http_state.clone()))
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_scope())
            .service(ws::ws_entry)
    })
    .workers(1)
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    (format!("http://{addr}"), server)
}

#[fixture]
async fn rig() -> Rig {
    let user = ProfileId::random();
    let feed = BroadcastChangeFeed::new(16);
    let (url, server) = start_server(user, feed.clone());
    let handle = server.handle();
    actix_web::rt::spawn(server);
    Rig {
        url,
        user,
        feed,
        _server: handle,
    }
}

async fn login(client: &awc::Client, url: &str) -> Cookie<'static> {
    let response = client
        .post(format!("{url}/api/v1/login"))
        .send_json(&json!({ "email": "ravi@example.com", "password": "secret1" }))
        .await
        .expect("login request");
    assert!(response.status().is_success());
    let cookies = response.cookies().expect("parse cookies");
    cookies
        .iter()
        .find(|c| c.name() == "session")
        .cloned()
        .expect("session cookie")
}

async fn connect(rig: &Rig) -> Socket {
    connect_signed_in(rig).await.0
}

async fn connect_signed_in(rig: &Rig) -> (Socket, Cookie<'static>) {
    let client = awc::Client::default();
    let cookie = login(&client, &rig.url).await;
    let (_resp, socket) = client
        .ws(format!("{}/ws", rig.url))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .cookie(cookie.clone())
        .connect()
        .await
        .expect("websocket connect");
    (socket, cookie)
}

async fn next_close(socket: &mut Socket) -> CloseReason {
    tokio::time::timeout(Duration::from_secs(2), async {
        while let Some(frame) = socket.next().await {
            match frame.expect("frame") {
                Frame::Close(reason) => return reason,
                Frame::Text(_) | Frame::Ping(_) | Frame::Pong(_) => continue,
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        None
    })
    .await
    .expect("close frame within timeout")
    .expect("close frame carries a reason")
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json frame"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn next_of_type(socket: &mut Socket, kind: &str) -> Value {
    loop {
        let value = next_json(socket).await;
        if value["type"] == kind {
            return value;
        }
    }
}

async fn send(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("send text");
}

#[rstest]
#[actix_rt::test]
async fn upgrade_requires_a_session(#[future] rig: Rig) {
    let rig = rig.await;
    let result = awc::Client::default()
        .ws(format!("{}/ws", rig.url))
        .set_header(header::ORIGIN, "http://localhost:3000")
        .connect()
        .await;

    match result {
        Err(awc::error::WsClientError::InvalidResponseStatus(status)) => {
            assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
        }
        other => panic!("expected 401, got {:?}", other.map(|(resp, _)| resp.status())),
    }
}

#[rstest]
#[actix_rt::test]
async fn reports_listener_connected(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;

    let frame = next_of_type(&mut socket, "listenerState").await;

    assert_eq!(frame["state"], "connected");
}

#[rstest]
#[actix_rt::test]
async fn addressed_rows_become_alert_frames(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;
    next_of_type(&mut socket, "listenerState").await;
    send(&mut socket, json!({ "type": "notificationPermission", "granted": true })).await;
    send(&mut socket, json!({ "type": "placeSearch", "query": "" })).await;
    next_of_type(&mut socket, "placeResults").await;

    rig.feed.publish(Notification::from_new(
        NotificationId::random(),
        NewNotification::to_vendor(rig.user, crate::domain::RequestId::random()),
        chrono::Utc::now(),
    ));

    let mut seen = std::collections::HashMap::new();
    while seen.len() < 3 {
        let frame = next_json(&mut socket).await;
        if let Some(kind) = frame["type"].as_str() {
            if ["tone", "systemNotification", "toast"].contains(&kind) {
                seen.insert(kind.to_owned(), frame);
            }
        }
    }
    assert_eq!(seen["tone"]["frequencyHz"], 800);
    assert_eq!(seen["systemNotification"]["title"], "New Request Received");
    assert_eq!(seen["systemNotification"]["tag"], "vendor-notification");
    assert_eq!(seen["toast"]["toasts"][0]["message"], "Priya requested Brake pads");
}

#[rstest]
#[actix_rt::test]
async fn rows_for_someone_else_are_ignored(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;
    next_of_type(&mut socket, "listenerState").await;

    rig.feed.publish(Notification::from_new(
        NotificationId::random(),
        NewNotification::to_vendor(ProfileId::random(), crate::domain::RequestId::random()),
        chrono::Utc::now(),
    ));
    send(&mut socket, json!({ "type": "placeSearch", "query": "" })).await;

    let frame = next_json(&mut socket).await;
    assert_eq!(frame["type"], "placeResults");
}

#[actix_rt::test]
async fn place_search_answers_only_the_settled_query() {
    tokio::time::pause();
    let state = WsState::new(
        Arc::new(BroadcastChangeFeed::new(4)),
        Arc::new(context()),
        Arc::new(geocoder()),
        OriginPolicy::new("partfinder.example"),
    );
    let (ws, mut outbound) = WsSession::new(&state, ProfileId::random());

    for query in ["Mum", "Mumbai"] {
        let frame = json!({ "type": "placeSearch", "query": query }).to_string();
        assert!(ws.handle_text_message(&frame).is_ok());
    }

    let Some(ServerFrame::PlaceResults { query, results }) = outbound.recv().await else {
        panic!("expected place results");
    };
    assert_eq!(query, "Mumbai");
    assert_eq!(results[0].city.as_deref(), Some("Mumbai"));

    tokio::time::sleep(PLACE_SEARCH_QUIET * 5).await;
    assert!(outbound.try_recv().is_err(), "superseded query must stay silent");
}

#[rstest]
#[actix_rt::test]
async fn place_results_travel_over_the_socket(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;
    next_of_type(&mut socket, "listenerState").await;

    send(&mut socket, json!({ "type": "placeSearch", "query": "Mumbai" })).await;

    let frame = next_of_type(&mut socket, "placeResults").await;
    assert_eq!(frame["query"], "Mumbai");
    assert_eq!(frame["results"][0]["city"], "Mumbai");
}

#[rstest]
#[actix_rt::test]
async fn logout_disconnects_the_live_listener(#[future] rig: Rig) {
    let rig = rig.await;
    let (mut socket, cookie) = connect_signed_in(&rig).await;
    let connected = next_of_type(&mut socket, "listenerState").await;
    assert_eq!(connected["state"], "connected");

    let response = awc::Client::default()
        .post(format!("{}/api/v1/logout", rig.url))
        .cookie(cookie)
        .send()
        .await
        .expect("logout request");
    assert_eq!(response.status(), actix_web::http::StatusCode::NO_CONTENT);

    let disconnected = next_of_type(&mut socket, "listenerState").await;
    assert_eq!(disconnected["state"], "disconnected");
    let reason = next_close(&mut socket).await;
    assert_eq!(reason.code, CloseCode::Normal);
    assert_eq!(reason.description.as_deref(), Some("signed out"));
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;
    socket
        .send(Message::Text("not-json".into()))
        .await
        .expect("send text");

    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Close(reason) => {
                assert_eq!(reason.expect("reason").code, CloseCode::Policy);
                break;
            }
            Frame::Text(_) | Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected close frame, got {other:?}"),
        }
    }
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(#[future] rig: Rig) {
    let rig = rig.await;
    let mut socket = connect(&rig).await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let reason = next_close(&mut socket).await;

    assert_eq!(reason.code, CloseCode::Normal);
    assert_eq!(reason.description.as_deref(), Some("heartbeat timeout"));
}
