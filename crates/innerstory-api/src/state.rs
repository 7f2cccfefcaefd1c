//! Shared application state.

use std::sync::Arc;

use innerstory_core::clock::Clock;
use innerstory_core::model::ModelClient;
use innerstory_throttle::ThrottleSet;

/// Application state shared across all request handlers.
///
/// Every field is a trait object or injectable value, so integration
/// tests substitute a fixed clock, a scripted model, and tight throttle
/// policies.
#[derive(Clone)]
pub struct AppState {
    /// Time source for throttle windows.
    pub clock: Arc<dyn Clock>,
    /// Upstream language model.
    pub model: Arc<dyn ModelClient>,
    /// Fixed-window throttle tables, one per route class.
    pub throttle: Arc<ThrottleSet>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        model: Arc<dyn ModelClient>,
        throttle: Arc<ThrottleSet>,
    ) -> Self {
        Self {
            clock,
            model,
            throttle,
        }
    }
}
