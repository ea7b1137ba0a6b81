//! Linear membership scans to set lookups

use super::{Rewrite, Transformer};
use crate::types::RewriteKind;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FOR_LINE: Regex =
        Regex::new(r"^(\s*)for\s+([A-Za-z_]\w*)\s+in\s+([A-Za-z_]\w*)\s*:\s*$").unwrap();
}

/// `for VAR in ITERABLE:` split into its parts
struct ForLine<'a> {
    indent: &'a str,
    var: &'a str,
    iterable: &'a str,
}

fn parse_for(line: &str) -> Option<ForLine<'_>> {
    FOR_LINE.captures(line).map(|caps| ForLine {
        indent: caps.get(1).map_or("", |m| m.as_str()),
        var: caps.get(2).map_or("", |m| m.as_str()),
        iterable: caps.get(3).map_or("", |m| m.as_str()),
    })
}

fn splice(lines: &[&str], at: usize, width: usize, replacement: &[String]) -> String {
    let mut out: Vec<&str> = lines[..at].to_vec();
    out.extend(replacement.iter().map(String::as_str));
    out.extend_from_slice(&lines[at + width..]);
    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Nested equality scan
///
/// ```text
/// for a in left:
///     for b in right:
///         if a == b:
///             out.append(a)
/// ```
///
/// becomes a single loop over `left` probing `right_set`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipSetRewriter;

impl Transformer for MembershipSetRewriter {
    fn kind(&self) -> RewriteKind {
        RewriteKind::MembershipSet
    }

    fn apply(&self, code: &str) -> Result<Rewrite> {
        let lines: Vec<&str> = code.lines().collect();

        for (idx, window) in lines.windows(4).enumerate() {
            let (Some(outer), Some(inner)) = (parse_for(window[0]), parse_for(window[1])) else {
                continue;
            };
            if inner.indent.len() <= outer.indent.len() {
                continue;
            }

            let item = regex::escape(outer.var);
            let equality = Regex::new(&format!(
                r"^\s*if\s+{item}\s*==\s*{}\s*:\s*$",
                regex::escape(inner.var)
            ))?;
            let append = Regex::new(&format!(r"^\s*([A-Za-z_]\w*)\.append\(\s*{item}\s*\)\s*$"))?;

            if !equality.is_match(window[2]) {
                continue;
            }
            let Some(output) = append.captures(window[3]).and_then(|caps| caps.get(1)) else {
                continue;
            };

            let indent = outer.indent;
            let right = inner.iterable;
            let replacement = [
                format!("{indent}{right}_set = set({right})"),
                format!("{indent}for {} in {}:", outer.var, outer.iterable),
                format!("{indent}    if {} in {right}_set:", outer.var),
                format!("{indent}        {}.append({})", output.as_str(), outer.var),
            ];
            return Ok(Rewrite::changed(splice(&lines, idx, 4, &replacement)));
        }

        Ok(Rewrite::unchanged(code))
    }
}

/// `if x in items:` directly inside a loop over `x`
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeatedMembershipRewriter;

impl Transformer for RepeatedMembershipRewriter {
    fn kind(&self) -> RewriteKind {
        RewriteKind::RepeatedMembership
    }

    fn apply(&self, code: &str) -> Result<Rewrite> {
        let lines: Vec<&str> = code.lines().collect();

        for (idx, window) in lines.windows(2).enumerate() {
            let Some(loop_line) = parse_for(window[0]) else {
                continue;
            };
            let condition = Regex::new(&format!(
                r"^\s*if\s+{}\s+in\s+([A-Za-z_]\w+)\s*:\s*$",
                regex::escape(loop_line.var)
            ))?;
            let Some(list) = condition.captures(window[1]).and_then(|caps| caps.get(1)) else {
                continue;
            };
            let list = list.as_str();
            if list.ends_with("_set") {
                continue;
            }

            let set_line = format!("{}{list}_set = set({list})", loop_line.indent);
            if code.contains(set_line.trim()) {
                continue;
            }
            let lookup = Regex::new(&format!(r"\bin\s+{}\b", regex::escape(list)))?;
            let new_condition = lookup
                .replace_all(window[1], format!("in {list}_set").as_str())
                .into_owned();

            let replacement = [set_line, window[0].to_string(), new_condition];
            return Ok(Rewrite::changed(splice(&lines, idx, 2, &replacement)));
        }

        Ok(Rewrite::unchanged(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMON: &str = "def common(a, b):\n    out = []\n    for x in a:\n        for y in b:\n            if x == y:\n                out.append(x)\n    return out\n";

    #[test]
    fn test_nested_scan_becomes_set_lookup() {
        let rewrite = MembershipSetRewriter.apply(COMMON).expect("rule");
        assert!(rewrite.changed);
        assert_eq!(
            rewrite.code,
            "def common(a, b):\n    out = []\n    b_set = set(b)\n    for x in a:\n        if x in b_set:\n            out.append(x)\n    return out\n"
        );
    }

    #[test]
    fn test_sibling_loops_are_untouched() {
        let code = "for x in a:\nfor y in b:\n    if x == y:\n        out.append(x)\n";
        assert!(!MembershipSetRewriter.apply(code).expect("rule").changed);
    }

    #[test]
    fn test_appending_other_variable_is_untouched() {
        let code = COMMON.replace("out.append(x)", "out.append(y)");
        assert!(!MembershipSetRewriter.apply(&code).expect("rule").changed);
    }

    #[test]
    fn test_repeated_membership_precomputes_set() {
        let code = "def keep(items, allowed):\n    kept = []\n    for item in items:\n        if item in allowed:\n            kept.append(item)\n    return kept\n";
        let rewrite = RepeatedMembershipRewriter.apply(code).expect("rule");
        assert!(rewrite.changed);
        assert_eq!(
            rewrite.code,
            "def keep(items, allowed):\n    kept = []\n    allowed_set = set(allowed)\n    for item in items:\n        if item in allowed_set:\n            kept.append(item)\n    return kept\n"
        );
    }

    #[test]
    fn test_repeated_membership_is_stable() {
        let code = "for item in items:\n    if item in allowed:\n        print(item)\n";
        let first = RepeatedMembershipRewriter.apply(code).expect("rule");
        let second = RepeatedMembershipRewriter.apply(&first.code).expect("rule");
        assert!(first.changed);
        assert!(!second.changed);
    }

    #[test]
    fn test_single_letter_list_is_untouched() {
        let code = "for x in a:\n    if x in b:\n        print(x)\n";
        assert!(!RepeatedMembershipRewriter.apply(code).expect("rule").changed);
    }
}
