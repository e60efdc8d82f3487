//! Per-connection WebSocket handler.
//!
//! Keeps framing and heartbeats at the edge. Alerts come from a
//! [`NotificationListener`] attached to the signed-in profile; its tone and
//! system-notification sinks push frames onto this connection, and toast
//! changes are mirrored as full snapshots. The public contract pings every
//! 5s and considers a connection idle after 10s without client traffic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::ports::Geocoder;
use crate::domain::{
    AlertDispatcher, DebouncedPlaceSearch, NotificationListener, ProfileId, SignOutWatch,
    ToastBus,
};
use crate::inbound::ws::messages::{ClientFrame, ServerFrame};
use crate::inbound::ws::sinks::{FrameSystemNotifier, FrameTonePlayer};
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Debounce for `placeSearch` frames (shorter in tests).
#[cfg(not(test))]
const PLACE_SEARCH_QUIET: Duration = crate::domain::PLACE_SEARCH_QUIET_PERIOD;
#[cfg(test)]
const PLACE_SEARCH_QUIET: Duration = Duration::from_millis(20);

pub(super) async fn handle_ws_session(
    state: WsState,
    user: ProfileId,
    session: Session,
    stream: MessageStream,
) {
    let (ws, outbound) = WsSession::new(&state, user);
    let sign_out = state.sign_outs.subscribe(user);
    ws.run(session, stream, outbound, sign_out)
        .instrument(info_span!("ws_session", user_id = %user))
        .await;
}

enum SessionError {
    SignedOut,
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    user: ProfileId,
    listener: NotificationListener,
    toasts: ToastBus,
    permission: Arc<AtomicBool>,
    places: Arc<DebouncedPlaceSearch<dyn Geocoder>>,
    frames: UnboundedSender<ServerFrame>,
}

impl WsSession {
    fn new(state: &WsState, user: ProfileId) -> (Self, UnboundedReceiver<ServerFrame>) {
        let (frames, outbound) = mpsc::unbounded_channel();
        let permission = Arc::new(AtomicBool::new(false));
        let toasts = ToastBus::new();
        let dispatcher = AlertDispatcher::new(
            Arc::new(FrameTonePlayer::new(frames.clone())),
            Arc::new(FrameSystemNotifier::new(
                frames.clone(),
                Arc::clone(&permission),
            )),
            toasts.clone(),
        );
        let listener = NotificationListener::new(
            Arc::clone(&state.feed),
            Arc::clone(&state.context),
            dispatcher,
        );
        let places = Arc::new(DebouncedPlaceSearch::with_quiet_period(
            Arc::clone(&state.geocoder),
            PLACE_SEARCH_QUIET,
        ));
        let session = Self {
            user,
            listener,
            toasts,
            permission,
            places,
            frames,
        };
        (session, outbound)
    }

    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut outbound: UnboundedReceiver<ServerFrame>,
        mut sign_out: SignOutWatch,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut toasts = self.toasts.subscribe();
        let mut listener_state = self.listener.watch_state();
        self.listener.attach(self.user);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                Some(frame) = outbound.recv() => {
                    send_frame(&mut session, &frame).await.map_err(SessionError::Network)
                }
                Some(active) = toasts.changed() => {
                    let frame = ServerFrame::Toast { toasts: active };
                    send_frame(&mut session, &frame).await.map_err(SessionError::Network)
                }
                Ok(()) = listener_state.changed() => {
                    let state = *listener_state.borrow_and_update();
                    let frame = ServerFrame::ListenerState { state };
                    send_frame(&mut session, &frame).await.map_err(SessionError::Network)
                }
                () = sign_out.signed_out() => Err(SessionError::SignedOut),
            };

            if let Err(error) = result {
                self.listener.detach();
                if matches!(error, SessionError::SignedOut) {
                    let frame = ServerFrame::ListenerState {
                        state: self.listener.state(),
                    };
                    if let Err(closed) = send_frame(&mut session, &frame).await {
                        debug!(error = %closed, "socket gone before sign-out was reported");
                    }
                }
                log_shutdown_reason(&error);
                close_session_if_needed(session, close_action_for(&error)).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(text.as_ref())
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    fn handle_text_message(&self, text: &str) -> Result<(), SessionError> {
        let frame = serde_json::from_str::<ClientFrame>(text).map_err(|error| {
            warn!(error = %error, "Rejected malformed WebSocket payload");
            SessionError::InvalidPayload
        })?;

        match frame {
            ClientFrame::PlaceSearch { query } => self.search_places(query),
            ClientFrame::DismissToast { id } => {
                if !self.toasts.dismiss(id) {
                    debug!(?id, "toast already gone");
                }
            }
            ClientFrame::NotificationPermission { granted } => {
                self.permission.store(granted, Ordering::Release);
            }
        }
        Ok(())
    }

    /// Answer once the query settles; superseded queries send nothing.
    fn search_places(&self, query: String) {
        let places = Arc::clone(&self.places);
        let frames = self.frames.clone();
        actix_web::rt::spawn(async move {
            let Some(results) = places.search(&query).await else {
                return;
            };
            if frames
                .send(ServerFrame::PlaceResults { query, results })
                .is_err()
            {
                debug!("socket closed before place results were ready");
            }
        });
    }
}

async fn send_frame(session: &mut Session, frame: &ServerFrame) -> Result<(), Closed> {
    match serde_json::to_string(frame) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "Failed to serialize WebSocket frame");
            Ok(())
        }
    }
}

fn log_shutdown_reason(error: &SessionError) {
    match error {
        SessionError::SignedOut => {
            info!("profile signed out; closing connection");
        }
        SessionError::HeartbeatTimeout => {
            warn!("WebSocket heartbeat timeout; closing connection");
        }
        SessionError::Protocol(error) => {
            warn!(error = %error, "WebSocket protocol error");
        }
        SessionError::Network(error) => {
            warn!(error = %error, "WebSocket send failed; closing connection");
        }
        SessionError::InvalidPayload | SessionError::ClientClosed(_) | SessionError::StreamClosed => {}
    }
}

fn close_action_for(error: &SessionError) -> CloseAction {
    match error {
        SessionError::SignedOut => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("signed out".to_owned()),
        })),
        SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Normal,
            description: Some("heartbeat timeout".to_owned()),
        })),
        SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Protocol,
            description: Some("protocol error".to_owned()),
        })),
        SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
            code: CloseCode::Policy,
            description: Some("invalid payload".to_owned()),
        })),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close WebSocket session");
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
