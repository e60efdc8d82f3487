//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_states;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use partfinder::Trace;
use partfinder::inbound::http::api_scope;
use partfinder::inbound::http::health::{HealthState, live, ready};
use partfinder::inbound::http::state::HttpState;
use partfinder::inbound::ws;
use partfinder::inbound::ws::state::WsState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    // The socket upgrade reads the same session as the API.
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api_scope())
        .service(ws::ws_entry)
        .service(ready)
        .service(live)
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let (http_state, ws_state) = build_states(&config);
    let http_state = web::Data::new(http_state);
    let ws_state = web::Data::new(ws_state);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use partfinder::inbound::ws::OriginPolicy;
    use serde_json::{Value, json};

    fn fixture_app_deps() -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            "127.0.0.1:0".parse().expect("valid address"),
            OriginPolicy::new("partfinder.example"),
        );
        let (http_state, ws_state) = build_states(&config);
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(http_state),
            ws_state: web::Data::new(ws_state),
            key: config.key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[actix_web::test]
    async fn health_endpoints_answer_on_the_assembled_app() {
        let app = test::init_service(build_app(fixture_app_deps())).await;
        for path in ["/health/live", "/health/ready"] {
            let res = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{path}");
            assert!(res.headers().contains_key("trace-id"));
        }
    }

    #[actix_web::test]
    async fn fixture_mode_signs_in_the_demo_account() {
        let app = test::init_service(build_app(fixture_app_deps())).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "demo@partfinder.test", "password": "password" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["profileId"],
            partfinder::domain::ports::FIXTURE_PROFILE_ID
        );
    }

    #[actix_web::test]
    async fn fixture_mode_accepts_new_accounts() {
        let app = test::init_service(build_app(fixture_app_deps())).await;
        let taken = test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({ "email": "demo@partfinder.test", "password": "password", "role": "client" }))
            .to_request();
        let res = test::call_service(&app, taken).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let fresh = test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({ "email": "asha@partfinder.test", "password": "secret1", "role": "client" }))
            .to_request();
        let res = test::call_service(&app, fresh).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["fullName"], "asha");
    }

    #[actix_web::test]
    async fn api_rejects_anonymous_callers() {
        let app = test::init_service(build_app(fixture_app_deps())).await;
        let req = test::TestRequest::get().uri("/api/v1/vendor/feed").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[::core::prelude::v1::test]
    fn api_sign_outs_reach_socket_sessions() {
        let deps = fixture_app_deps();
        let profile = partfinder::domain::ProfileId::random();
        let _watch = deps.ws_state.sign_outs.subscribe(profile);

        assert_eq!(deps.http_state.sign_outs.sign_out(profile), 1);
    }
}
