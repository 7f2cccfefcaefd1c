//! Text sanitation for scene content.
//!
//! Removes the markdown the model sprinkles over its narrative output and
//! decodes the five standard HTML entities. Idempotent, and a no-op on
//! ordinary prose.

use std::sync::LazyLock;

use regex::Regex;

/// Lines that are only a horizontal rule.
static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*\r?$\n?").unwrap());

/// Heading markers at line start.
static HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+").unwrap());

/// Paired single-asterisk emphasis within one line.
static ITALIC_PAIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());

/// Two or more consecutive blank(ish) lines.
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").unwrap());

/// Decodes `&amp; &lt; &gt; &quot; &#39;` in a single left-to-right pass.
fn decode_entities(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(position) = rest.find('&') {
        decoded.push_str(&rest[..position]);
        rest = &rest[position..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, replacement)) => {
                decoded.push(*replacement);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Scrubs markdown markers and entities out of scene text.
#[must_use]
pub fn sanitize(text: &str) -> String {
    let cleaned = HORIZONTAL_RULE.replace_all(text, "");
    let cleaned = HEADING_PREFIX.replace_all(&cleaned, "");
    let cleaned = cleaned
        .replace("**", "")
        .replace("__", "")
        .replace("~~", "")
        .replace('`', "");
    let cleaned = ITALIC_PAIR.replace_all(&cleaned, "$1");
    let cleaned = BLANK_RUN.replace_all(&cleaned, "\n\n");
    decode_entities(&cleaned).trim().to_owned()
}
