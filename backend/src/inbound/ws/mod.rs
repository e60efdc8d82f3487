//! WebSocket inbound adapter pushing live alerts to signed-in browsers.
//!
//! Responsibilities:
//! - validate upgrade requests (session and origin allow-list)
//! - run one notification listener per connection
//! - answer debounced place searches

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, warn};
use url::Url;

use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod sinks;
pub mod state;

/// Handle the WebSocket upgrade for `/ws`.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<state::WsState>,
    auth: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let user = auth.require_profile_id()?;

    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin_header)?;

    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        actix_web::error::ErrorInternalServerError("WebSocket upgrade failed")
    })?;
    let state = state.get_ref().clone();
    actix_web::rt::spawn(session::handle_ws_session(state, user, ws_session, messages));
    Ok(response)
}

/// Origins allowed to open a socket.
///
/// HTTPS from the public host and its subdomains, plus plain HTTP from
/// `localhost` with an explicit non-zero port for development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    public_host: String,
}

impl OriginPolicy {
    pub fn new(public_host: impl Into<String>) -> Self {
        Self {
            public_host: public_host.into().to_ascii_lowercase(),
        }
    }

    pub fn is_allowed(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };
        match origin.scheme() {
            "http" if host == LOCALHOST => matches!(origin.port(), Some(port) if port != 0),
            "https" if host == self.public_host => true,
            "https" => host
                .strip_suffix(self.public_host.as_str())
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
            _ => false,
        }
    }
}

const LOCALHOST: &str = "localhost";

fn validate_origin(policy: &OriginPolicy, origin_header: &HeaderValue) -> actix_web::Result<()> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;

    if policy.is_allowed(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
