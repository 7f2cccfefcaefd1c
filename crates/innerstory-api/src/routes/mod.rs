//! Route modules and shared caller-identity helpers.

pub mod admissions;
pub mod conversation;
pub mod health;

use axum::http::HeaderMap;
use innerstory_core::identity::CallerIdentity;

/// Best-effort client IP: the first hop of `x-forwarded-for`.
pub(crate) fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .unwrap_or("unknown")
        .to_owned()
}

/// The gateway-supplied user id when present, the client IP otherwise.
pub(crate) fn resolve_identity(user_id: Option<&str>, headers: &HeaderMap) -> CallerIdentity {
    match user_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => CallerIdentity::User(id.to_owned()),
        None => CallerIdentity::Ip(client_ip(headers)),
    }
}
