//! Domain error types.

use thiserror::Error;

use crate::identity::RouteClass;

/// Top-level domain error type.
///
/// Quota conditions are distinct, retryable-later outcomes and must never
/// be conflated with server faults. Malformed client input is not an error
/// at all: it is clamped to safe defaults at the edge.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller exhausted the fixed-window budget for a route class.
    #[error("rate limit exceeded for {route}")]
    RateLimited {
        /// The route class whose window is exhausted.
        route: RouteClass,
    },

    /// An unauthenticated caller exhausted the guest turn budget.
    #[error("guest turn budget exhausted")]
    GuestQuotaExceeded,

    /// The upstream language model failed or returned nothing usable.
    #[error("upstream model error: {0}")]
    Upstream(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
