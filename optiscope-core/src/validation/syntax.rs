//! Syntax gates that do not depend on the tree provider

use crate::language::Language;
use crate::tree::{SyntaxNode, TreeProvider, TreeSitterProvider};

/// A rejected snippet: message plus 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
}

impl SyntaxError {
    fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: line.max(1),
        }
    }
}

impl From<SyntaxError> for crate::Error {
    fn from(error: SyntaxError) -> Self {
        crate::Error::Syntax {
            message: error.message,
            line: error.line,
        }
    }
}

/// Bracket counts of one line, outside strings and comments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LineBrackets {
    open_brace: i64,
    close_brace: i64,
    open_paren: i64,
    close_paren: i64,
}

impl LineBrackets {
    fn count(&mut self, bracket: char) {
        match bracket {
            '{' => self.open_brace += 1,
            '}' => self.close_brace += 1,
            '(' => self.open_paren += 1,
            ')' => self.close_paren += 1,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    LineComment,
    BlockComment,
    Str { quote: char, triple: bool },
}

/// Count brackets per line, skipping string literals and comments.
fn scan_brackets(code: &str, language: Language) -> Vec<LineBrackets> {
    let chars: Vec<char> = code.chars().collect();
    let mut lines = vec![LineBrackets::default()];
    let mut state = ScanState::Code;
    let mut i = 0;

    let starts_with = |at: usize, pattern: &str| {
        pattern
            .chars()
            .enumerate()
            .all(|(offset, c)| chars.get(at + offset) == Some(&c))
    };

    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            lines.push(LineBrackets::default());
            match state {
                ScanState::LineComment => state = ScanState::Code,
                // Unterminated single-line strings end with the line
                ScanState::Str { triple: false, quote } if quote != '`' => state = ScanState::Code,
                _ => {}
            }
            i += 1;
            continue;
        }

        match state {
            ScanState::Code => {
                match c {
                    '{' | '}' | '(' | ')' => {
                        if let Some(current) = lines.last_mut() {
                            current.count(c);
                        }
                    }
                    '#' if language == Language::Python => state = ScanState::LineComment,
                    '/' if language.uses_braces() && starts_with(i, "//") => {
                        state = ScanState::LineComment;
                        i += 1;
                    }
                    '/' if language.uses_braces() && starts_with(i, "/*") => {
                        state = ScanState::BlockComment;
                        i += 1;
                    }
                    '"' | '\'' | '`' => {
                        let triple = language == Language::Python
                            && c != '`'
                            && starts_with(i, &c.to_string().repeat(3));
                        if triple {
                            i += 2;
                        }
                        if c != '`' || language.uses_braces() {
                            state = ScanState::Str { quote: c, triple };
                        }
                    }
                    _ => {}
                }
            }
            ScanState::LineComment => {}
            ScanState::BlockComment => {
                if starts_with(i, "*/") {
                    state = ScanState::Code;
                    i += 1;
                }
            }
            ScanState::Str { quote, triple } => {
                if c == '\\' {
                    i += 1;
                } else if c == quote {
                    if !triple {
                        state = ScanState::Code;
                    } else if starts_with(i, &quote.to_string().repeat(3)) {
                        state = ScanState::Code;
                        i += 2;
                    }
                }
            }
        }
        i += 1;
    }

    lines
}

fn mismatch_line(deltas: impl Iterator<Item = i64>, line_total: usize) -> usize {
    let mut balance = 0;
    for (index, delta) in deltas.enumerate() {
        balance += delta;
        if balance < 0 {
            return index + 1;
        }
    }
    line_total.max(1)
}

/// Reject snippets whose `{}` or `()` counts disagree.
///
/// Braces are checked before parentheses. The reported line is the first
/// one where the running balance goes negative, else the last line.
pub fn check_brackets(code: &str, language: Language) -> Option<SyntaxError> {
    let lines = scan_brackets(code, language);
    let line_total = code.lines().count();

    let opened: i64 = lines.iter().map(|l| l.open_brace).sum();
    let closed: i64 = lines.iter().map(|l| l.close_brace).sum();
    if opened != closed {
        let line = mismatch_line(
            lines.iter().map(|l| l.open_brace - l.close_brace),
            line_total,
        );
        return Some(SyntaxError::new("Invalid syntax: unbalanced braces.", line));
    }

    let opened: i64 = lines.iter().map(|l| l.open_paren).sum();
    let closed: i64 = lines.iter().map(|l| l.close_paren).sum();
    if opened != closed {
        let line = mismatch_line(
            lines.iter().map(|l| l.open_paren - l.close_paren),
            line_total,
        );
        return Some(SyntaxError::new(
            "Invalid syntax: unbalanced parentheses.",
            line,
        ));
    }

    None
}

/// First `ERROR`/`MISSING` node of a tree, reported as a bare syntax error
pub fn tree_error(root: &SyntaxNode) -> Option<SyntaxError> {
    root.first_error()
        .map(|node| SyntaxError::new("Invalid syntax", node.line()))
}

/// Python compile check for the text strategy, using the bundled grammar
pub fn python_compile_check(code: &str) -> Option<SyntaxError> {
    let Some(tree) = TreeSitterProvider::new().parse(Language::Python, code) else {
        return Some(SyntaxError::new("Invalid syntax: unparseable source", 1));
    };

    tree.root.first_error().map(|node| {
        let detail = if node.is_missing {
            format!("missing '{}'", node.kind)
        } else {
            let snippet: String = node.text(code).chars().take(20).collect();
            format!("unexpected '{}'", snippet.trim())
        };
        SyntaxError::new(format!("Invalid syntax: {detail}"), node.line())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_balanced_code_passes() {
        let code = "int main() {\n  if (x) { return 1; }\n  return 0;\n}\n";
        assert_eq!(check_brackets(code, Language::C), None);
    }

    #[test]
    fn test_missing_close_brace_reports_last_line() {
        let code = "int main() {\n  return 0;\n";
        let error = check_brackets(code, Language::C).expect("unbalanced");
        assert_eq!(error.message, "Invalid syntax: unbalanced braces.");
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_extra_close_paren_reports_first_negative_line() {
        let code = "x = 1\ny = (2))\nz = 3\n";
        let error = check_brackets(code, Language::Python).expect("unbalanced");
        assert_eq!(error.message, "Invalid syntax: unbalanced parentheses.");
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_brackets_in_strings_and_comments_are_ignored() {
        let python = "s = '{('  # )\nt = \"\"\"\n}\n\"\"\"\n";
        assert_eq!(check_brackets(python, Language::Python), None);

        let js = "const s = \"}\"; // {\n/* ( */ let t = `)`;\n";
        assert_eq!(check_brackets(js, Language::JavaScript), None);
    }

    #[test]
    fn test_braces_checked_before_parens() {
        let code = "f((x) {\n";
        let error = check_brackets(code, Language::JavaScript).expect("unbalanced");
        assert_eq!(error.message, "Invalid syntax: unbalanced braces.");
    }

    #[test]
    fn test_python_compile_check() {
        assert_eq!(python_compile_check("def ok():\n    return 1\n"), None);
        let error = python_compile_check("def broken(:\n    return 1").expect("invalid");
        assert!(error.message.starts_with("Invalid syntax: "));
        assert_eq!(error.line, 1);
    }

    proptest! {
        #[test]
        fn test_unbalanced_braces_always_rejected(
            body in "[a-z =;\\n]{0,40}",
            extra_open in 1usize..4,
        ) {
            let code = format!("{}{}\n", "{".repeat(extra_open), body);
            let error = check_brackets(&code, Language::C);
            prop_assert!(error.is_some());
        }

        #[test]
        fn test_negative_balance_line_is_reported(prefix_lines in 0usize..6) {
            let mut code = "x = 1\n".repeat(prefix_lines);
            code.push_str("}\n{\n");
            let error = check_brackets(&code, Language::Go);
            // Counts agree, so this is accepted by the gate
            prop_assert!(error.is_none());

            code.push_str("}\n");
            let error = check_brackets(&code, Language::Go).expect("unbalanced");
            prop_assert_eq!(error.line, prefix_lines + 1);
        }
    }
}
