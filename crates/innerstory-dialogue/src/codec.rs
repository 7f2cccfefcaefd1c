//! Phase tag codec.
//!
//! The model declares which stage a reply belongs to with a bracketed
//! marker such as `[PHASE:2]`. Replies arrive with the marker spelled in
//! several tolerated variants, so recognition is a fixed, ordered set of
//! patterns rather than ad hoc scanning. Nothing marker-shaped may ever
//! leak into participant-visible text.

use std::sync::LazyLock;

use regex::Regex;

use crate::stage::Stage;

/// The recognized marker: case-insensitive keyword, optional interior
/// whitespace, colon or bare space before the digit.
/// Matches `[PHASE:2]`, `[phase: 2]`, `[PHASE 2]`.
static PHASE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*phase\s*[:\s]\s*(\d)\s*\]").unwrap());

/// Strip form of `PHASE_MARKER`, also consuming trailing inline space.
static PHASE_MARKER_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*phase\s*[:\s]\s*\d\s*\][ \t]*").unwrap());

/// A line consisting of nothing but the marker keyword, with optional
/// colon and digit (the model sometimes drops the brackets).
static STANDALONE_PHASE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*phase[ \t]*:?[ \t]*\d*[ \t]*\r?$\n?").unwrap());

/// Catch-all for any leftover bracketed fragment that begins with the
/// keyword, including an unterminated `[PHASE...` tail cut off by a token
/// budget. Unrelated bracketed content never starts with the keyword and
/// is left alone.
static RESIDUAL_PHASE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*phase[^\]\n]*\]?[ \t]*").unwrap());

/// Completion markers for the terminal stage: a mention of the ninth or
/// tenth narrative beat, or either wisdom section marker.
const COMPLETION_MARKERS: [&str; 4] = ["scene 9", "scene 10", "[wisdom]", "wisdom of the story"];

/// Returns the stage number declared by the first marker in `text`, or
/// `None` when no marker is present.
///
/// The digit is returned even outside 1..=4; range validation is the
/// caller's job.
#[must_use]
pub fn detect(text: &str) -> Option<u32> {
    PHASE_MARKER
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|digit| digit.as_str().parse().ok())
}

/// Removes every recognized marker occurrence, every standalone
/// marker-keyword line, and any residual bracketed fragment that begins
/// with the keyword.
///
/// Idempotent, and never removes unrelated bracketed content such as
/// `[Image Prompt: ...]`.
#[must_use]
pub fn strip(text: &str) -> String {
    let stripped = PHASE_MARKER_STRIP.replace_all(text, "");
    let stripped = STANDALONE_PHASE_LINE.replace_all(&stripped, "");
    let stripped = RESIDUAL_PHASE_FRAGMENT.replace_all(&stripped, "");
    stripped.trim().to_owned()
}

/// True when the reply belongs to the terminal stage and contains one of
/// the fixed completion markers.
///
/// When no marker was detected, the caller's claimed stage stands in for
/// the detected one; the model occasionally omits the marker on its final,
/// longest reply.
#[must_use]
pub fn completion_signal(text: &str, detected: Option<u32>, client_stage: Stage) -> bool {
    let terminal = match detected {
        Some(number) => number == Stage::NarrativeSynthesis.number(),
        None => client_stage.is_terminal(),
    };
    if !terminal {
        return false;
    }
    let lowered = text.to_lowercase();
    COMPLETION_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
