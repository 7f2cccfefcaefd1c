//! Multi-strategy scene extraction.
//!
//! The model is asked for ten tagged beats, but long replies get cut off,
//! retried, or reformatted. Three strategies run in order, strictest
//! first, and the first one that matches anything wins; whatever they
//! find goes through the same finalization: ordinals outside 1..=10
//! discarded, duplicates first-wins, empty blocks dropped, result sorted.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::sanitize::sanitize;
use crate::scene::Scene;

/// The story never has more than ten scenes.
pub const MAX_SCENES: u32 = 10;

/// Canonical beat labels, two per act, with their display titles.
const BEAT_LABELS: [(&str, &str); 10] = [
    ("OPENING", "Opening"),
    ("OPENING DEEPENS", "Opening Deepens"),
    ("CONFLICT", "Conflict"),
    ("CONFLICT ESCALATES", "Conflict Escalates"),
    ("ATTEMPT", "Attempt"),
    ("ATTEMPT ESCALATES", "Attempt Escalates"),
    ("RESOLUTION", "Resolution"),
    ("RESOLUTION DEEPENS", "Resolution Deepens"),
    ("INSIGHT", "Insight"),
    ("INSIGHT FOR THE CHILD", "Insight for the Child"),
];

/// Canonical tagged markers, e.g. `[SCENE 3: CONFLICT]`. Longer labels
/// come first in the alternation so `CONFLICT ESCALATES` is not cut to
/// `CONFLICT`.
static TAGGED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[\s*scene\s*(\d{1,2})\s*[:\-]\s*(opening\s+deepens|conflict\s+escalates|attempt\s+escalates|resolution\s+deepens|insight\s+for\s+the\s+child|opening|conflict|attempt|resolution|insight)\s*\]",
    )
    .unwrap()
});

/// Looser `scene N` marker on its own line: bracketed, bolded, or bare,
/// with an optional separator and trailing title.
static LOOSE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*|\[)?[ \t]*scene[ \t]+(\d{1,2})[ \t]*(?:\]|\*\*)?[ \t]*[:.\-]?[ \t]*(.*)$")
        .unwrap()
});

/// Bare `N.` / `N)` list items, the last resort.
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\d{1,2})[.)][ \t]+(.*)$").unwrap());

/// A short dash-prefixed gloss as the first line of a block — an
/// in-prompt description, not participant-facing content.
static LEADING_GLOSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\s*[-–][ \t][^\n]{0,78}(?:\n|\z)").unwrap());

/// Embedded illustration directive, lifted into `image_prompt`.
static IMAGE_PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[\s*image\s*prompt\s*:\s*([^\]]+)\]").unwrap());

/// An unfinalized block produced by one of the strategies, in text order.
struct RawBlock {
    ordinal: u32,
    title: String,
    body: String,
}

fn canonical_title(label: &str) -> String {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    BEAT_LABELS
        .iter()
        .find(|(canonical, _)| canonical.eq_ignore_ascii_case(&normalized))
        .map_or_else(|| normalized.clone(), |(_, title)| (*title).to_owned())
}

/// Primary strategy: blocks delimited by the canonical tagged markers.
fn tagged_blocks(text: &str) -> Vec<RawBlock> {
    let markers: Vec<(usize, usize, u32, String)> = TAGGED_MARKER
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let ordinal = captures.get(1)?.as_str().parse().ok()?;
            let title = canonical_title(captures.get(2)?.as_str());
            Some((whole.start(), whole.end(), ordinal, title))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(index, (_, end, ordinal, title))| {
            let body_end = markers
                .get(index + 1)
                .map_or(text.len(), |(next_start, ..)| *next_start);
            let body = LEADING_GLOSS.replace(&text[*end..body_end], "").into_owned();
            RawBlock {
                ordinal: *ordinal,
                title: title.clone(),
                body,
            }
        })
        .collect()
}

/// Secondary strategy: loose `scene N` markers when no tagged block
/// matched.
fn loose_markers(text: &str) -> Vec<RawBlock> {
    let markers: Vec<(usize, usize, u32, String)> = LOOSE_MARKER
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let ordinal = captures.get(1)?.as_str().parse().ok()?;
            let rest = captures.get(2)?.as_str();
            let title = sanitize(rest.trim_end_matches(['*', ']', ':', ' ', '\t']));
            Some((whole.start(), whole.end(), ordinal, title))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(index, (_, end, ordinal, title))| {
            let body_end = markers
                .get(index + 1)
                .map_or(text.len(), |(next_start, ..)| *next_start);
            let title = if title.is_empty() {
                format!("Scene {ordinal}")
            } else {
                title.clone()
            };
            RawBlock {
                ordinal: *ordinal,
                title,
                body: text[*end..body_end].to_owned(),
            }
        })
        .collect()
}

/// Tertiary strategy: bare numbered list items.
fn numbered_list(text: &str) -> Vec<RawBlock> {
    let markers: Vec<(usize, usize, u32)> = NUMBERED_ITEM
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let ordinal = captures.get(1)?.as_str().parse().ok()?;
            let first_line = captures.get(2)?;
            Some((whole.start(), first_line.start(), ordinal))
        })
        .collect();

    markers
        .iter()
        .enumerate()
        .map(|(index, (_, body_start, ordinal))| {
            let body_end = markers
                .get(index + 1)
                .map_or(text.len(), |(next_line_start, ..)| *next_line_start);
            RawBlock {
                ordinal: *ordinal,
                title: format!("Scene {ordinal}"),
                body: text[*body_start..body_end].to_owned(),
            }
        })
        .collect()
}

fn lift_image_prompt(body: &str) -> (String, Option<String>) {
    let prompt = IMAGE_PROMPT
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|description| description.as_str().trim().to_owned())
        .filter(|description| !description.is_empty());
    let remaining = IMAGE_PROMPT.replace_all(body, "").into_owned();
    (remaining, prompt)
}

/// Shared finalization for every strategy's output.
fn finalize(blocks: Vec<RawBlock>) -> Vec<Scene> {
    let mut seen = HashSet::new();
    let mut scenes: Vec<Scene> = Vec::new();

    for block in blocks {
        if block.ordinal < 1 || block.ordinal > MAX_SCENES {
            continue;
        }
        let (body, image_prompt) = lift_image_prompt(&block.body);
        let text = sanitize(&body);
        if text.is_empty() {
            continue;
        }
        // First occurrence wins: a retry later in the transcript must not
        // overwrite an already-captured scene.
        if !seen.insert(block.ordinal) {
            continue;
        }
        scenes.push(Scene {
            scene_number: block.ordinal,
            title: sanitize(&block.title),
            text,
            image_prompt,
        });
    }

    scenes.sort_by_key(|scene| scene.scene_number);
    scenes
}

/// Extracts the ordered scene list from accumulated terminal-stage text.
///
/// Never fails: truncated trailing fragments are ignored, and text with
/// no recognizable markers yields an empty list, which callers treat as
/// "story not yet ready".
#[must_use]
pub fn extract_scenes(text: &str) -> Vec<Scene> {
    let strategies: [fn(&str) -> Vec<RawBlock>; 3] = [tagged_blocks, loose_markers, numbered_list];
    for strategy in strategies {
        let blocks = strategy(text);
        if !blocks.is_empty() {
            return finalize(blocks);
        }
    }
    Vec::new()
}
