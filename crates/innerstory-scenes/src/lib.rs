//! Innerstory — scene extraction context.
//!
//! Turns the accumulated terminal-stage narrative text into an ordered,
//! deduplicated list of up to ten scene records, with markdown and
//! entity noise scrubbed out. Parsing is a fixed sequence of strategies,
//! strictest first; the first one that matches anything wins.

pub mod extract;
pub mod sanitize;
pub mod scene;

pub use extract::extract_scenes;
pub use sanitize::sanitize;
pub use scene::Scene;
