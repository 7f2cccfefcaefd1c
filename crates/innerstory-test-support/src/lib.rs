//! Shared test mocks and utilities for the Innerstory engine.

mod clock;
mod model;

pub use clock::FixedClock;
pub use model::{FailingModelClient, ScriptedModelClient, SilentModelClient};
