//! Innerstory Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all other
//! crates depend on: the conversation transcript, caller identity, the
//! clock and upstream-model seams, and the domain error taxonomy. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod identity;
pub mod model;
pub mod transcript;
