//! Text helpers shared by the analysis and rewrite crates

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref FENCE_OPEN: Regex = Regex::new(r"^```[a-zA-Z0-9_+-]*\n").unwrap();
    static ref FENCE_CLOSE: Regex = Regex::new(r"\n```$").unwrap();
}

/// Truncate on a grapheme boundary, appending `...` when anything was cut
#[must_use]
pub fn safe_truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }

    let budget = max_len.saturating_sub(3);
    let mut truncated = String::new();
    for grapheme in text.graphemes(true) {
        if truncated.len() + grapheme.len() > budget {
            break;
        }
        truncated.push_str(grapheme);
    }
    truncated.push_str("...");
    truncated
}

/// NFC-normalize, collapse whitespace runs to single spaces and trim
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    WHITESPACE_RUN.replace_all(&normalized, " ").trim().to_string()
}

/// Remove every whitespace character and lower-case the rest.
///
/// Used for whitespace-insensitive signature matching (`whileleft<right`).
#[must_use]
pub fn squeeze_lowercase(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 1-based line number of a byte offset
#[must_use]
pub fn line_of_offset(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Strip up to `width` leading spaces from every line of `block`
#[must_use]
pub fn dedent_block(block: &str, width: usize) -> String {
    block
        .lines()
        .map(|line| {
            let leading = line.len() - line.trim_start_matches(' ').len();
            &line[leading.min(width)..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove a surrounding Markdown code fence, always ending with one newline
#[must_use]
pub fn strip_code_fences(code: &str) -> String {
    let mut stripped = code.trim().to_string();
    if stripped.starts_with("```") {
        stripped = FENCE_OPEN.replace(&stripped, "").into_owned();
        stripped = FENCE_CLOSE.replace(&stripped, "").into_owned();
    }
    format!("{}\n", stripped.trim())
}

/// Signed decimal with at most two fractional digits and no exponent (`+0`, `+12.5`, `-3.25`)
#[must_use]
pub fn format_signed(value: f64) -> String {
    let mut digits = format!("{:.2}", value.abs());
    while digits.ends_with('0') {
        digits.pop();
    }
    if digits.ends_with('.') {
        digits.pop();
    }
    let negative = value < 0.0 && digits != "0";
    format!("{}{digits}", if negative { '-' } else { '+' })
}
