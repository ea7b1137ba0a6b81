//! Naive two-branch recursion to `functools.lru_cache`

use super::{Rewrite, Transformer};
use crate::types::RewriteKind;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TWO_BRANCH: Regex = Regex::new(concat!(
        r"def\s+([A-Za-z_]\w*)\s*\(\s*n\s*\)\s*:\s*\n",
        r"\s*if\s+n\s*<=\s*1\s*:\s*\n",
        r"\s*return\s+n\s*\n",
        r"\s*return\s+([A-Za-z_]\w*)\(n-1\)\s*\+\s*([A-Za-z_]\w*)\(n-2\)",
    ))
    .unwrap();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoizationRewriter;

impl MemoizationRewriter {
    fn memoized(name: &str) -> String {
        format!(
            "from functools import lru_cache\n\n@lru_cache(maxsize=None)\ndef {name}(n):\n    if n <= 1:\n        return n\n    return {name}(n-1) + {name}(n-2)"
        )
    }

    /// Only module-level definitions without decorators qualify
    fn is_bare_top_level(code: &str, start: usize) -> bool {
        let prefix = &code[..start];
        if !(prefix.is_empty() || prefix.ends_with('\n')) {
            return false;
        }
        prefix
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map_or(true, |line| !line.trim_start().starts_with('@'))
    }
}

impl Transformer for MemoizationRewriter {
    fn kind(&self) -> RewriteKind {
        RewriteKind::Memoization
    }

    /// Splices the memoized definition over the matched function, leaving the
    /// rest of the module in place.
    fn apply(&self, code: &str) -> Result<Rewrite> {
        for caps in TWO_BRANCH.captures_iter(code) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str();
            let self_calls = [caps.get(2), caps.get(3)]
                .into_iter()
                .all(|call| call.is_some_and(|m| m.as_str() == name));
            if !self_calls || !Self::is_bare_top_level(code, whole.start()) {
                continue;
            }

            let mut rewritten = String::with_capacity(code.len() + 64);
            rewritten.push_str(&code[..whole.start()]);
            rewritten.push_str(&Self::memoized(name));
            rewritten.push_str(&code[whole.end()..]);
            if !rewritten.ends_with('\n') {
                rewritten.push('\n');
            }
            return Ok(Rewrite::changed(rewritten));
        }

        Ok(Rewrite::unchanged(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIB: &str = "def fib(n):\n    if n <= 1:\n        return n\n    return fib(n-1) + fib(n-2)\n";

    #[test]
    fn test_fibonacci_is_memoized() {
        let rewrite = MemoizationRewriter.apply(FIB).expect("rule");
        assert!(rewrite.changed);
        assert_eq!(
            rewrite.code,
            "from functools import lru_cache\n\n@lru_cache(maxsize=None)\ndef fib(n):\n    if n <= 1:\n        return n\n    return fib(n-1) + fib(n-2)\n"
        );
    }

    #[test]
    fn test_surrounding_code_is_kept() {
        let code = format!("import sys\n\n{FIB}\nprint(fib(int(sys.argv[1])))\n");
        let rewrite = MemoizationRewriter.apply(&code).expect("rule");
        assert!(rewrite.changed);
        assert!(rewrite.code.starts_with("import sys\n\nfrom functools import lru_cache\n"));
        assert!(rewrite.code.ends_with("print(fib(int(sys.argv[1])))\n"));
    }

    #[test]
    fn test_already_memoized_is_untouched() {
        let first = MemoizationRewriter.apply(FIB).expect("rule");
        let second = MemoizationRewriter.apply(&first.code).expect("rule");
        assert!(!second.changed);
        assert_eq!(second.code, first.code);
    }

    #[test]
    fn test_calls_to_other_functions_are_untouched() {
        let code = FIB.replace("fib(n-2)", "other(n-2)");
        assert!(!MemoizationRewriter.apply(&code).expect("rule").changed);
    }

    #[test]
    fn test_methods_are_untouched() {
        let code = "class M:\n    def fib(n):\n        if n <= 1:\n            return n\n        return fib(n-1) + fib(n-2)\n";
        assert!(!MemoizationRewriter.apply(code).expect("rule").changed);
    }
}
