//! HTTP inbound adapter exposing REST endpoints.

use actix_web::{Scope, web};

pub mod error;
pub mod health;
pub mod places;
pub mod requests;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Every `/api/v1` route.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::PayloadConfig::new(requests::MAX_IMAGE_BYTES))
        .service(users::sign_up)
        .service(users::login)
        .service(users::logout)
        .service(users::current_profile)
        .service(users::update_profile)
        .service(users::update_phone)
        .service(users::change_password)
        .service(requests::preview_request)
        .service(requests::create_request)
        .service(requests::close_request)
        .service(requests::respond)
        .service(requests::vendor_feed)
        .service(requests::my_requests)
        .service(requests::upload_image)
        .service(places::search_places)
        .service(places::reverse_place)
}
