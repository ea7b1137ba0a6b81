//! Textual idiom signatures used by the complexity classifier

use lazy_static::lazy_static;
use optiscope_utils::squeeze_lowercase;
use regex::Regex;

lazy_static! {
    static ref LOG_UPDATE_COMPOUND: Regex =
        Regex::new(r"\b[A-Za-z_]\w*\s*(\*=|/=|>>=|<<=)\s*2\b").unwrap();
    static ref LOG_UPDATE_ASSIGN: Regex =
        Regex::new(r"\b[A-Za-z_]\w*\s*=\s*[A-Za-z_]\w*\s*([*/]|>>|<<)\s*2\b").unwrap();
    static ref ANY_SCALING_UPDATE: Regex = Regex::new(r"\*=|/=|>>=|<<=").unwrap();
    static ref LOOP_LINE: Regex = Regex::new(r"\b(for|while)\b").unwrap();
    static ref DEFINED_NAME: Vec<Regex> = vec![
        Regex::new(r"\bdef\s+([A-Za-z_]\w*)\s*\(").unwrap(),
        Regex::new(r"\bfunc\s+(?:\([^)]*\)\s*)?([A-Za-z_]\w*)\s*\(").unwrap(),
        Regex::new(r"\bfunction\s+([A-Za-z_]\w*)\s*\(").unwrap(),
        Regex::new(r"\b([A-Za-z_]\w*)\s*\([^)]*\)\s*\{").unwrap(),
    ];
}

const THREE_SUM_TOKENS: [&str; 11] = [
    ".sort()",
    "foriinrange(",
    "left,right=i+1,n-1",
    "whileleft<right",
    "total=",
    "left+=1",
    "right-=1",
    "[i]",
    "[left]",
    "[right]",
    "total==0",
];

const HEADER_KEYWORDS: [&str; 5] = ["if", "for", "while", "switch", "catch"];

/// Sorted two-pointer triple-sum, recognised on whitespace-free text
pub fn is_sorted_two_pointer_triple_sum(code: &str) -> bool {
    let squeezed = squeeze_lowercase(code);
    THREE_SUM_TOKENS
        .iter()
        .all(|token| squeezed.contains(token))
}

/// Bounds check, midpoint assignment and a half-discarding update
pub fn is_binary_search(code: &str) -> bool {
    let squeezed = squeeze_lowercase(code);
    let bounds = squeezed.contains("left<=right") || squeezed.contains("low<=high");
    let narrows = ["left=mid+1", "right=mid-1", "low=mid+1", "high=mid-1"]
        .iter()
        .any(|update| squeezed.contains(update));
    bounds && squeezed.contains("mid=") && narrows
}

/// Doubling or halving update such as `i *= 2` or `n = n / 2`
pub fn has_log_update(code: &str) -> bool {
    LOG_UPDATE_COMPOUND.is_match(code) || LOG_UPDATE_ASSIGN.is_match(code)
}

/// Any compound scaling assignment, the looser text-strategy signal
pub fn has_scaling_update(code: &str) -> bool {
    ANY_SCALING_UPDATE.is_match(code)
}

/// Non-blank lines mentioning `for` or `while`
pub fn loop_line_count(code: &str) -> usize {
    code.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && LOOP_LINE.is_match(line))
        .count()
}

/// Names introduced by a function header
pub fn defined_names(code: &str) -> Vec<String> {
    let mut names: Vec<String> = DEFINED_NAME
        .iter()
        .flat_map(|pattern| pattern.captures_iter(code))
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
        .filter(|name| !HEADER_KEYWORDS.contains(&name.as_str()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Occurrences of `name(` with word boundary
pub fn call_count(name: &str, text: &str) -> usize {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name)))
        .map_or(0, |pattern| pattern.find_iter(text).count())
}
