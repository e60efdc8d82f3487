//! Part request handlers.
//!
//! ```text
//! POST /api/v1/requests
//! POST /api/v1/requests/preview
//! POST /api/v1/requests/{id}/close
//! PUT  /api/v1/requests/{id}/response {"status":"accepted"}
//! GET  /api/v1/vendor/feed
//! GET  /api/v1/requests/mine
//! POST /api/v1/request-images?fileName=pads.jpg   (raw image body)
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ClosedRequest, CreatedRequest, ImageUpload, MatchPreview};
use crate::domain::{
    Coordinates, FanoutReport, PartRequest, PartResponse, RequestDraft, RequestHistoryEntry,
    ResponseStatus, SearchArea, SearchScope, VendorPreference,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_request_id};

/// Largest accepted request image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Where and to whom a request is addressed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaForm {
    pub area: SearchArea,
    #[serde(default)]
    pub area_city: Option<String>,
    #[serde(default)]
    pub area_state: Option<String>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub vendor_preference: VendorPreference,
}

impl AreaForm {
    fn scope(&self) -> SearchScope {
        self.area.scope_for(
            self.area_city.as_deref(),
            self.area_state.as_deref(),
            self.location,
        )
    }
}

/// Body of `POST /api/v1/requests`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestForm {
    pub category: String,
    pub part_name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub preferred_company: Option<String>,
    #[serde(flatten)]
    pub area: AreaForm,
}

impl From<RequestForm> for RequestDraft {
    fn from(form: RequestForm) -> Self {
        let RequestForm {
            category,
            part_name,
            description,
            image_url,
            preferred_company,
            area,
        } = form;
        Self {
            category,
            part_name,
            description,
            image_url,
            preferred_company,
            area: area.area,
            area_city: area.area_city,
            area_state: area.area_state,
            location: area.location,
            vendor_preference: area.vendor_preference,
        }
    }
}

/// A request together with the notifications its change produced.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    pub request: PartRequest,
    pub fanout: FanoutReport,
}

impl From<CreatedRequest> for RequestOutcome {
    fn from(value: CreatedRequest) -> Self {
        Self {
            request: value.request,
            fanout: value.fanout,
        }
    }
}

impl From<ClosedRequest> for RequestOutcome {
    fn from(value: ClosedRequest) -> Self {
        Self {
            request: value.request,
            fanout: value.fanout,
        }
    }
}

/// Post a request and fan it out to matching vendors.
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RequestForm>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_profile_id()?;
    let created = state
        .requests
        .create_request(&caller, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(RequestOutcome::from(created)))
}

/// Preview body: the counts plus whether to ask before posting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub preview: MatchPreview,
    pub requires_confirmation: bool,
}

/// Count the vendors a request with this area would reach.
#[post("/requests/preview")]
pub async fn preview_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AreaForm>,
) -> ApiResult<web::Json<PreviewResponse>> {
    let caller = session.require_profile_id()?;
    let form = payload.into_inner();
    let preview = state.preview.preview(&caller, &form.scope()).await;
    Ok(web::Json(PreviewResponse {
        requires_confirmation: preview.requires_confirmation(form.vendor_preference),
        preview,
    }))
}

/// Close one of the caller's open requests.
#[post("/requests/{id}/close")]
pub async fn close_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RequestOutcome>> {
    let caller = session.require_profile_id()?;
    let request_id = parse_request_id(&path)?;
    let closed = state.requests.close_request(&caller, &request_id).await?;
    Ok(web::Json(closed.into()))
}

/// Body of `PUT /api/v1/requests/{id}/response`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RespondForm {
    pub status: ResponseStatus,
}

/// Accept, reject or complete someone else's request.
#[put("/requests/{id}/response")]
pub async fn respond(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RespondForm>,
) -> ApiResult<web::Json<PartResponse>> {
    let caller = session.require_profile_id()?;
    let request_id = parse_request_id(&path)?;
    let response = state
        .requests
        .respond(&caller, &request_id, payload.status)
        .await?;
    Ok(web::Json(response))
}

/// Open client requests the signed-in vendor can act on.
#[get("/vendor/feed")]
pub async fn vendor_feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PartRequest>>> {
    let caller = session.require_profile_id()?;
    Ok(web::Json(state.feed.feed(&caller).await?))
}

/// Requests the caller posted, each with the responses it drew.
#[get("/requests/mine")]
pub async fn my_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RequestHistoryEntry>>> {
    let caller = session.require_profile_id()?;
    Ok(web::Json(state.history.my_requests(&caller).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQuery {
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Store a request image and return its public URL.
#[post("/request-images")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<ImageQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let caller = session.require_profile_id()?;
    let file_name = query
        .into_inner()
        .file_name
        .ok_or_else(|| missing_field_error(FieldName::new("fileName")))?;
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| missing_field_error(FieldName::new("contentType")))?
        .to_owned();
    let url = state
        .requests
        .upload_request_image(
            &caller,
            ImageUpload {
                file_name,
                content_type,
                bytes: body.to_vec(),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(UploadedImage { url }))
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
