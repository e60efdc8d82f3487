//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, ProfileId};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Session middleware with a throwaway key and an insecure cookie named
/// `session`, suitable for plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Login service that signs everyone in as one profile.
pub struct StaticLogin(pub ProfileId);

#[async_trait]
impl LoginService for StaticLogin {
    async fn authenticate(&self, _credentials: &LoginCredentials) -> Result<ProfileId, Error> {
        Ok(self.0)
    }
}

/// Fixture ports that sign every login in as `profile`.
pub fn ports_for(profile: ProfileId) -> HttpStatePorts {
    HttpStatePorts::fixtures(Arc::new(StaticLogin(profile)))
}

/// The full API under test session middleware.
pub fn test_app(
    ports: HttpStatePorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    test_app_with_state(HttpState::new(ports))
}

/// [`test_app`] over a prepared state.
pub fn test_app_with_state(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(api_scope())
}

/// Log in through the API and return the session cookie.
pub async fn sign_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": "ravi@example.com", "password": "secret1" }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    session_cookie(&response)
}
