//! Geocoding handlers backing the location fields of the request form.
//!
//! ```text
//! GET /api/v1/places/search?q=andheri
//! GET /api/v1/places/reverse?lat=19.07&lon=72.87
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::PlaceSuggestion;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_coordinates};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Candidate places for free text. Lookup failures read as no results.
#[get("/places/search")]
pub async fn search_places(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<PlaceSuggestion>>> {
    session.require_profile_id()?;
    let q = query
        .into_inner()
        .q
        .ok_or_else(|| missing_field_error(FieldName::new("q")))?;
    if q.trim().is_empty() {
        return Ok(web::Json(Vec::new()));
    }
    Ok(web::Json(state.geocoder.search(q.trim()).await))
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lon: f64,
}

/// The place at a position, or `null` when nothing useful is known.
#[get("/places/reverse")]
pub async fn reverse_place(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ReverseQuery>,
) -> ApiResult<web::Json<Option<PlaceSuggestion>>> {
    session.require_profile_id()?;
    let at = parse_coordinates(query.lat, query.lon)?;
    Ok(web::Json(state.geocoder.reverse(at).await))
}
