//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The session cookie only stores the signed-in profile id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, ProfileId};

pub(crate) const PROFILE_ID_KEY: &str = "profile_id";

/// Wrapper exposing profile-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in profile, rotating the session id.
    pub fn persist_profile(&self, id: &ProfileId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(PROFILE_ID_KEY, id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in profile, if any. A tampered value reads as signed out.
    pub fn profile_id(&self) -> Result<Option<ProfileId>, Error> {
        let raw = self
            .0
            .get::<String>(PROFILE_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match ProfileId::new(&raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid profile id in session cookie");
                None
            }
        }))
    }

    /// The signed-in profile or `401 Unauthorized`.
    pub fn require_profile_id(&self) -> Result<ProfileId, Error> {
        self.profile_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the signed-in profile.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
