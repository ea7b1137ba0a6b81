//! Brute-force Three Sum to sorted two-pointer search

use super::{Rewrite, Transformer};
use crate::types::RewriteKind;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FUNCTION_HEADER: Regex =
        Regex::new(r"(?m)^\s*def\s+([A-Za-z_]\w*)\s*\(\s*([A-Za-z_]\w*)").unwrap();
    static ref EMPTY_LIST_INIT: Regex =
        Regex::new(r"(?m)^\s*([A-Za-z_]\w*)\s*=\s*\[\s*\]\s*$").unwrap();
    static ref RETURN_NAME: Regex = Regex::new(r"(?m)^\s*return\s+([A-Za-z_]\w*)\s*$").unwrap();
}

const RANGE_LOOPS: [&str; 3] = ["for i in range", "for j in range", "for k in range"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeSumRewriter;

impl ThreeSumRewriter {
    /// Name of the list collecting triplets
    fn result_variable(code: &str) -> String {
        EMPTY_LIST_INIT
            .captures(code)
            .or_else(|| RETURN_NAME.captures(code))
            .and_then(|caps| caps.get(1))
            .map_or_else(|| "result".to_string(), |m| m.as_str().to_string())
    }

    fn has_zero_sum(code: &str, array: &str) -> Result<bool> {
        let a = regex::escape(array);
        let pattern = Regex::new(&format!(
            r"{a}\s*\[\s*i\s*\]\s*\+\s*{a}\s*\[\s*j\s*\]\s*\+\s*{a}\s*\[\s*k\s*\]\s*==\s*0"
        ))?;
        Ok(pattern.is_match(code))
    }

    fn has_duplicate_filter(code: &str, result: &str) -> Result<bool> {
        if code.contains("triplet not in") {
            return Ok(true);
        }
        let pattern = Regex::new(&format!(
            r"\bif\s+\w+\s+not\s+in\s+{}\s*:",
            regex::escape(result)
        ))?;
        Ok(pattern.is_match(code))
    }

    fn two_pointer(function: &str, array: &str, result: &str) -> String {
        let a = array;
        let lines = [
            format!("def {function}({a}):"),
            format!("    {a}.sort()"),
            format!("    {result} = []"),
            format!("    n = len({a})"),
            "    for i in range(n - 2):".to_string(),
            format!("        if i > 0 and {a}[i] == {a}[i - 1]:"),
            "            continue".to_string(),
            "        left, right = i + 1, n - 1".to_string(),
            "        while left < right:".to_string(),
            format!("            total = {a}[i] + {a}[left] + {a}[right]"),
            "            if total == 0:".to_string(),
            format!("                {result}.append([{a}[i], {a}[left], {a}[right]])"),
            "                left += 1".to_string(),
            "                right -= 1".to_string(),
            format!("                while left < right and {a}[left] == {a}[left - 1]:"),
            "                    left += 1".to_string(),
            format!("                while left < right and {a}[right] == {a}[right + 1]:"),
            "                    right -= 1".to_string(),
            "            elif total < 0:".to_string(),
            "                left += 1".to_string(),
            "            else:".to_string(),
            "                right -= 1".to_string(),
            format!("    return {result}"),
        ];
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

impl Transformer for ThreeSumRewriter {
    fn kind(&self) -> RewriteKind {
        RewriteKind::ThreeSum
    }

    /// Replaces the whole snippet with the two-pointer template when the
    /// triple range loop, the zero-sum test and a duplicate filter all match.
    fn apply(&self, code: &str) -> Result<Rewrite> {
        let Some(header) = FUNCTION_HEADER.captures(code) else {
            return Ok(Rewrite::unchanged(code));
        };
        let function = &header[1];
        let array = &header[2];
        let result = Self::result_variable(code);

        let matched = RANGE_LOOPS.iter().all(|needle| code.contains(needle))
            && Self::has_zero_sum(code, array)?
            && Self::has_duplicate_filter(code, &result)?;

        if !matched {
            return Ok(Rewrite::unchanged(code));
        }
        Ok(Rewrite::changed(Self::two_pointer(function, array, &result)))
    }
}
