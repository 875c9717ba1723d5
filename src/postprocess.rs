//! Rewrite model output (Markdown-ish) into Slack mrkdwn and fix the
//! run-together paragraphs models tend to emit.
//!
//! The rewrite is idempotent: summaries are cached and follow-up answers go
//! through the same pass, so output fed back in must come out unchanged.
//! Code spans are masked first and restored byte-for-byte at the end.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex must compile")
}

static CODE_BLOCK: Lazy<Regex> = Lazy::new(|| re(r"(?s)```.*?```"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| re(r"`[^`\n]+`"));
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| re(r"\x{E000}(\d+)\x{E001}"));

static HEADING: Lazy<Regex> = Lazy::new(|| re(r"(?m)^[ \t]*#{1,6}[ \t]+(.+?)[ \t#]*$"));
static MD_BULLET: Lazy<Regex> = Lazy::new(|| re(r"(?m)^[ \t]*[-*+][ \t]+"));
static MD_LINK: Lazy<Regex> = Lazy::new(|| re(r"\[([^\]\n]+)\]\((https?://[^)\s]+)\)"));
static DOUBLE_BOLD: Lazy<Regex> = Lazy::new(|| re(r"\*\*(.+?)\*\*"));
static STAR_RUN: Lazy<Regex> = Lazy::new(|| re(r"\*{2,}"));

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| re(r" {2,}"));
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| re(r"(?m)[ \t]+$"));

// Section headers look like `📘 *About*`; they need a blank line above.
static HEADER_EMOJI: Lazy<Regex> = Lazy::new(|| {
    re(r"([^\n])\n?[ \t]*((?:📘|🛠|⚙|▶|🔗|👋|🎯|🎨|🚀)\x{FE0F}?[ \t]*\*)")
});
static NUMBERED_THEN_TEXT: Lazy<Regex> =
    Lazy::new(|| re(r"(?m)^(\d+\.[ \t][^\n]*)\n([^\d\s•\n][^\n]*)"));
static TEXT_THEN_BULLET: Lazy<Regex> = Lazy::new(|| re(r"(?m)^([^•\n][^\n]*[^:*\n])\n•"));
static BULLET_THEN_TEXT: Lazy<Regex> = Lazy::new(|| re(r"(?m)^(•[^\n]*)\n([^•\s\n][^\n]*)"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| re(r"\n{3,}"));

/// Convert generated text to Slack formatting.
pub fn postprocess(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let (text, spans) = mask_code(&text);

    let text = HEADING.replace_all(&text, |caps: &Captures| {
        format!("*{}*", caps[1].replace('*', "").trim())
    });
    let text = MD_BULLET.replace_all(&text, "• ");
    let text = MD_LINK.replace_all(&text, "<${2}|${1}>");
    let text = DOUBLE_BOLD.replace_all(&text, "*${1}*");
    let text = STAR_RUN.replace_all(&text, "*");
    let text = drop_orphan_stars(&text);

    let text = MULTI_SPACE.replace_all(&text, " ");
    let text = TRAILING_WS.replace_all(&text, "");

    let text = HEADER_EMOJI.replace_all(&text, "${1}\n\n${2}");
    let text = NUMBERED_THEN_TEXT.replace_all(&text, "${1}\n\n${2}");
    let text = TEXT_THEN_BULLET.replace_all(&text, "${1}\n\n•");
    let text = BULLET_THEN_TEXT.replace_all(&text, "${1}\n\n${2}");
    // An indented header can leave its indent behind on a line of its own.
    let text = TRAILING_WS.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");

    unmask_code(text.trim(), &spans)
}

/// Swap code spans for private-use placeholders that no later rule touches.
/// Fenced blocks go first so their backticks are not read as inline code.
fn mask_code(text: &str) -> (String, Vec<String>) {
    let mut spans: Vec<String> = Vec::new();
    let mut masked = text.to_string();
    for pattern in [&*CODE_BLOCK, &*INLINE_CODE] {
        masked = pattern
            .replace_all(&masked, |caps: &Captures| {
                spans.push(caps[0].to_string());
                format!("\u{E000}{}\u{E001}", spans.len() - 1)
            })
            .into_owned();
    }
    (masked, spans)
}

fn unmask_code(text: &str, spans: &[String]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| spans.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn is_gap(c: Option<&char>) -> bool {
    c.is_none_or(|c| c.is_whitespace())
}

/// Remove `*` characters with whitespace (or text edge) on both sides.
/// Runs of stars are already collapsed, so a kept star never borders a
/// removed one.
fn drop_orphan_stars(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            !(c == '*' && is_gap(before) && is_gap(chars.get(i + 1)))
        })
        .map(|(_, &c)| c)
        .collect()
}
