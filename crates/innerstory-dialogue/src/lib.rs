//! Innerstory — dialogue protocol context.
//!
//! The authoritative, server-side view of which of the four therapeutic
//! stages a conversation is in. The codec reads and removes the stage
//! marker the model embeds in its replies; the machine computes the
//! per-turn directive and enforces that a stage, once reached, is never
//! left backwards.

pub mod codec;
pub mod machine;
pub mod stage;
