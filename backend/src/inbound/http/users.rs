//! Session and profile handlers.
//!
//! ```text
//! POST /api/v1/signup {"email":"ravi@example.com","password":"secret1","role":"vendor",..}
//! POST /api/v1/login {"email":"ravi@example.com","password":"secret1"}
//! POST /api/v1/logout
//! GET /api/v1/profile
//! PUT /api/v1/profile {"city":"Pune","location":{"latitude":18.52,"longitude":73.85}}
//! PUT /api/v1/profile/phone {"phone":"+91 98200 00000"}
//! PUT /api/v1/profile/password {"currentPassword":"..","newPassword":"..","confirmPassword":".."}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Coordinates, LoginCredentials, PasswordChange, Profile, ProfileUpdate, Registration, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::login_validation_error;

/// Body of `POST /api/v1/signup`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl From<SignUpRequest> for Registration {
    fn from(body: SignUpRequest) -> Self {
        Self {
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            phone: body.phone,
            role: body.role,
            business_name: body.business_name,
            category: body.category,
            city: body.city,
        }
    }
}

/// Create an account and sign straight into it.
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let profile = state.accounts.sign_up(payload.into_inner().into()).await?;
    session.persist_profile(&profile.id)?;
    Ok(HttpResponse::Created().json(profile))
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body returned after a successful login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub profile_id: String,
}

/// Authenticate against the identity provider and establish a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(login_validation_error)?;
    let profile_id = state.login.authenticate(&credentials).await?;
    session.persist_profile(&profile_id)?;
    Ok(web::Json(LoginResponse {
        profile_id: profile_id.to_string(),
    }))
}

/// Drop the session and disconnect the profile's live listeners. Idempotent.
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    let signed_in = session.profile_id().ok().flatten();
    session.clear();
    if let Some(profile) = signed_in {
        let live = state.sign_outs.sign_out(profile);
        info!(profile = %profile, live, "signed out");
    }
    HttpResponse::NoContent().finish()
}

/// The signed-in user's profile.
#[get("/profile")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Profile>> {
    let caller = session.require_profile_id()?;
    Ok(web::Json(state.accounts.profile(&caller).await?))
}

/// Body of `PUT /api/v1/profile`. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub location: Option<Coordinates>,
    pub authorized_dealer: Option<bool>,
    pub companies: Option<Vec<String>>,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(body: ProfileUpdateRequest) -> Self {
        Self {
            full_name: body.full_name,
            phone: body.phone,
            business_name: body.business_name,
            category: body.category,
            city: body.city,
            state: body.state,
            location: body.location,
            authorized_dealer: body.authorized_dealer,
            companies: body.companies,
        }
    }
}

/// Edit the caller's profile, including the fields vendor matching reads.
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdateRequest>,
) -> ApiResult<web::Json<Profile>> {
    let caller = session.require_profile_id()?;
    let profile = state
        .accounts
        .update_profile(&caller, payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// Body of `PUT /api/v1/profile/password`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[put("/profile/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PasswordChangeRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_profile_id()?;
    let PasswordChangeRequest {
        current_password,
        new_password,
        confirm_password,
    } = payload.into_inner();
    let change = PasswordChange::try_new(&current_password, &new_password, &confirm_password)?;
    state.accounts.change_password(&caller, change).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Body for `PUT /api/v1/profile/phone`.
#[derive(Debug, Deserialize, Serialize)]
pub struct PhoneRequest {
    pub phone: String,
}

/// Store the caller's contact number so they can accept requests.
#[put("/profile/phone")]
pub async fn update_phone(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PhoneRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_profile_id()?;
    state.requests.set_phone(&caller, &payload.phone).await?;
    info!(profile = %caller, "phone number updated");
    Ok(HttpResponse::NoContent().finish())
}
