//! Admission pre-checks for throttled community route classes.
//!
//! Collaborators that own likes, reviews, and PDF exports call these
//! endpoints before their own writes; the only answer is whether the
//! caller's fixed window still admits the request.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use innerstory_core::error::DomainError;
use innerstory_core::identity::{CallerIdentity, RouteClass};

use crate::error::ApiError;
use crate::routes::{client_ip, resolve_identity};
use crate::state::AppState;

/// The throttled route classes exposed as admission checks.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionRoute {
    /// Anonymous story likes.
    Like,
    /// Story review submissions.
    Review,
    /// PDF export requests.
    Export,
}

/// Request body for POST /{route}. An empty object is valid.
#[derive(Debug, Default, Deserialize)]
pub struct AdmissionRequest {
    /// Gateway-supplied authenticated user id, if any.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response body returned when the window admits the request.
#[derive(Debug, Serialize)]
pub struct AdmissionResponse {
    /// Always true; rejection is reported as a 429 instead.
    pub admitted: bool,
}

/// POST /{route}
#[instrument(skip(state, headers, request), fields(route = ?route))]
async fn check_admission(
    State(state): State<AppState>,
    Path(route): Path<AdmissionRoute>,
    headers: HeaderMap,
    Json(request): Json<AdmissionRequest>,
) -> Result<Json<AdmissionResponse>, ApiError> {
    let route_class = match route {
        AdmissionRoute::Like => RouteClass::Like,
        AdmissionRoute::Review => RouteClass::Review,
        AdmissionRoute::Export => RouteClass::PdfExport,
    };

    // Likes stay IP-keyed even for authenticated callers.
    let identity = if route_class == RouteClass::Like {
        CallerIdentity::Ip(client_ip(&headers))
    } else {
        resolve_identity(request.user_id.as_deref(), &headers)
    };

    if !state
        .throttle
        .admit(route_class, &identity.key(), state.clock.now())
    {
        return Err(DomainError::RateLimited { route: route_class }.into());
    }

    Ok(Json(AdmissionResponse { admitted: true }))
}

/// Returns the router for the admissions context.
pub fn router() -> Router<AppState> {
    Router::new().route("/{route}", post(check_admission))
}
