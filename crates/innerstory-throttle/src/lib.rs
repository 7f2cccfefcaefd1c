//! Innerstory — throttling context.
//!
//! Per-process, best-effort request throttling: fixed-window counters per
//! route class, plus the hard guest turn ceiling. Under horizontal
//! scale-out each host keeps its own counters, so the limits here are an
//! approximation; a deployment needing exact limits backs the set with an
//! external atomic counter store instead.

pub mod guest;
pub mod policy;
pub mod window;

pub use guest::{GUEST_TURN_LIMIT, guest_budget_exceeded};
pub use policy::ThrottleSet;
pub use window::{FixedWindowTable, RatePolicy};
