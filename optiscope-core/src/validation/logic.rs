//! Logic checks
//!
//! Five independent heuristics run in a fixed order. Only the infinite-loop
//! check can produce an error; everything else is a warning that ends up in
//! the suggestion list.

use super::ParsedProgram;
use crate::constants::SuggestionThresholds;
use crate::language::Language;
use crate::models::LogicIssue;
use crate::tree::SyntaxNode;
use lazy_static::lazy_static;
use optiscope_utils::{collapse_whitespace, line_of_offset, squeeze_lowercase};
use regex::Regex;
use std::collections::HashMap;

pub const UNREACHABLE_MESSAGE: &str = "Unreachable code detected after return statement.";
pub const INFINITE_LOOP_MESSAGE: &str =
    "Potential infinite loop detected: loop condition is always true without break.";
pub const EMPTY_HANDLER_MESSAGE: &str = "Empty catch/except block detected.";
pub const MISSING_RETURN_MESSAGE: &str =
    "Possible missing return path in function with conditional returns.";

lazy_static! {
    static ref DECLARATION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\b(?:var|let|const)\s+([A-Za-z_]\w*)").unwrap(),
        Regex::new(r"\b(?:int|float|double|long|short|char|bool|String|auto|var)\s+([A-Za-z_]\w*)")
            .unwrap(),
        Regex::new(r"\b([A-Za-z_]\w*)\s*:=").unwrap(),
        Regex::new(r"(?m)^\s*([A-Za-z_]\w*)\s*=\s*[^=]").unwrap(),
    ];
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
    static ref PYTHON_EMPTY_EXCEPT: Regex = Regex::new(r"except[^\n]*:\s*(pass|\.\.\.)").unwrap();
    static ref EMPTY_CATCH_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"catch\s*\([^)]*\)\s*\{\s*\}").unwrap(),
        Regex::new(r"(?s)catch\s*\([^)]*\)\s*\{\s*/\*.*?\*/\s*\}").unwrap(),
        Regex::new(r"catch\s*\([^)]*\)\s*\{\s*//[^\n]*\s*\}").unwrap(),
    ];
    static ref IF_WORD: Regex = Regex::new(r"\bif\b").unwrap();
    static ref ENDS_WITH_RETURN: Regex = Regex::new(r"\breturn\b[^;{}]*;?\s*\}\s*$").unwrap();
}

const IGNORED_NAMES: &[&str] = &["i", "j", "k", "n", "m", "tmp", "temp"];
const ALWAYS_TRUE: &[&str] = &["true", "(true)", "1", "(1)"];

/// Run every check against a parsed program
pub fn run_logic_checks(program: &ParsedProgram) -> Vec<LogicIssue> {
    let mut issues = Vec::new();

    if let Some(line) = unreachable_after_return(program) {
        issues.push(LogicIssue::warning(UNREACHABLE_MESSAGE, line));
    }
    if let Some(line) = infinite_loop(program) {
        issues.push(LogicIssue::error(INFINITE_LOOP_MESSAGE, line));
    }
    if let Some((names, line)) = unused_variables(&program.code) {
        issues.push(LogicIssue::warning(
            format!("Unused variables detected: {}.", names.join(", ")),
            line,
        ));
    }
    if let Some(line) = empty_exception_handler(&program.code, program.language) {
        issues.push(LogicIssue::warning(EMPTY_HANDLER_MESSAGE, line));
    }
    if let Some(line) = missing_return_path(program) {
        issues.push(LogicIssue::warning(MISSING_RETURN_MESSAGE, line));
    }

    issues
}

fn is_return_like(node: &SyntaxNode) -> bool {
    node.is_named && node.kind.contains("return")
}

fn is_statement_like(node: &SyntaxNode) -> bool {
    node.is_named
        && (node.kind.ends_with("statement")
            || node.kind.ends_with("declaration")
            || matches!(node.kind.as_str(), "assignment" | "call"))
}

fn contains_break(node: &SyntaxNode) -> bool {
    node.any(&|n| n.is_named && n.kind.contains("break"))
}

/// First statement following a return among its siblings.
///
/// Siblings hung under a field (the braceless `else` branch of an `if`) are
/// alternatives, not successors, and are skipped.
fn unreachable_after_return(program: &ParsedProgram) -> Option<usize> {
    fn visit(node: &SyntaxNode) -> Option<usize> {
        let mut found_return = false;
        for child in &node.children {
            if found_return && child.field.is_none() && is_statement_like(child) {
                return Some(child.line());
            }
            if is_return_like(child) {
                found_return = true;
            }
            if let Some(line) = visit(child) {
                return Some(line);
            }
        }
        None
    }

    program.tree.as_ref().and_then(|tree| visit(&tree.root))
}

fn is_always_true(text: &str) -> bool {
    let normalized = squeeze_lowercase(text);
    ALWAYS_TRUE.contains(&normalized.trim_end_matches(';'))
}

/// Condition of a C-style `for`, `None` when the clause is absent or empty
fn for_condition<'a>(node: &'a SyntaxNode, code: &str, language: Language) -> Option<&'a SyntaxNode> {
    let present = |candidate: &'a SyntaxNode| {
        let text = candidate.text(code);
        let empty = text.chars().all(|c| c.is_whitespace() || c == ';');
        (!empty).then_some(candidate)
    };

    if language != Language::Go {
        return node.child_by_field("condition").and_then(present);
    }

    // Go: `for {}`, `for cond {}`, `for init; cond; post {}` or `for range xs {}`
    let clause = node
        .named_children()
        .find(|child| child.field.as_deref() != Some("body") && !child.kind.contains("comment"))?;
    match clause.kind.as_str() {
        "for_clause" => clause.child_by_field("condition").and_then(present),
        _ => present(clause),
    }
}

fn infinite_loop(program: &ParsedProgram) -> Option<usize> {
    let code = &program.code;
    let language = program.language;

    let Some(tree) = &program.tree else {
        if code.contains("break") {
            return None;
        }
        return code.lines().enumerate().find_map(|(index, line)| {
            let normalized = squeeze_lowercase(line);
            ["whiletrue:", "while(true)", "while(1)", "for(;;)"]
                .iter()
                .any(|marker| normalized.contains(marker))
                .then_some(index + 1)
        });
    };

    tree.root.descendants().into_iter().find_map(|node| {
        if !node.is_named {
            return None;
        }
        let body = node.child_by_field("body").unwrap_or(node);
        let always_true = match node.kind.as_str() {
            "while_statement" => node
                .child_by_field("condition")
                .is_some_and(|condition| is_always_true(condition.text(code))),
            "for_statement" if language != Language::Python => {
                match for_condition(node, code, language) {
                    None => true,
                    Some(condition) => {
                        condition.kind != "range_clause" && is_always_true(condition.text(code))
                    }
                }
            }
            _ => false,
        };
        (always_true && !contains_break(body)).then(|| node.line())
    })
}

/// Declared names that appear once; sorted, capped, with the first name's declaration line
fn unused_variables(code: &str) -> Option<(Vec<String>, usize)> {
    let mut declared: HashMap<&str, usize> = HashMap::new();
    for pattern in DECLARATION_PATTERNS.iter() {
        for captures in pattern.captures_iter(code) {
            if let Some(name) = captures.get(1) {
                let offset = declared.entry(name.as_str()).or_insert(name.start());
                *offset = (*offset).min(name.start());
            }
        }
    }

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for word in WORD.find_iter(code) {
        *occurrences.entry(word.as_str()).or_default() += 1;
    }

    let mut unused: Vec<(&str, usize)> = declared
        .into_iter()
        .filter(|(name, _)| !IGNORED_NAMES.contains(name) && !name.starts_with('_'))
        .filter(|(name, _)| occurrences.get(name).copied().unwrap_or(0) <= 1)
        .collect();
    unused.sort_unstable();
    unused.truncate(SuggestionThresholds::MAX_UNUSED_NAMES);

    let (_, first_offset) = *unused.first()?;
    let names = unused.iter().map(|(name, _)| (*name).to_string()).collect();
    Some((names, line_of_offset(code, first_offset)))
}

fn empty_exception_handler(code: &str, language: Language) -> Option<usize> {
    if language == Language::Python {
        if let Some(found) = PYTHON_EMPTY_EXCEPT.find(code) {
            return Some(line_of_offset(code, found.start()));
        }
    }

    EMPTY_CATCH_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(code))
        .map(|found| line_of_offset(code, found.start()))
}

fn ends_with_return(body_text: &str, language: Language) -> bool {
    if language == Language::Python {
        return body_text
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .is_some_and(|line| {
                line == "return" || line.starts_with("return ") || line.starts_with("return(")
            });
    }
    ENDS_WITH_RETURN.is_match(&collapse_whitespace(body_text))
}

/// Function with conditional returns whose body does not end in a return
fn missing_return_path(program: &ParsedProgram) -> Option<usize> {
    let tree = program.tree.as_ref()?;
    let code = &program.code;
    let rules = program.language.rules();

    tree.root.descendants().into_iter().find_map(|node| {
        if !node.is_named || !rules.is_function(&node.kind) {
            return None;
        }
        let body = node.child_by_field("body")?;
        let body_text = body.text(code);
        if !IF_WORD.is_match(body_text) || !body.any(&is_return_like) {
            return None;
        }
        (!ends_with_return(body_text, program.language)).then(|| node.line())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NoTreeProvider, TreeSitterProvider};
    use crate::validation::Validator;
    use std::sync::Arc;

    fn program(code: &str, language: Language) -> ParsedProgram {
        Validator::new(Arc::new(TreeSitterProvider::new()))
            .parse(code, language)
            .expect("valid program")
    }

    fn text_program(code: &str, language: Language) -> ParsedProgram {
        Validator::new(Arc::new(NoTreeProvider))
            .parse(code, language)
            .expect("valid program")
    }

    fn messages(issues: &[LogicIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.message.as_str()).collect()
    }

    #[test]
    fn test_python_while_true_is_an_error() {
        let issues = run_logic_checks(&program(
            "def f():\n    while True:\n        x = 1\n",
            Language::Python,
        ));
        let error = issues.iter().find(|issue| issue.is_error()).expect("error");
        assert_eq!(error.message, INFINITE_LOOP_MESSAGE);
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_loop_with_break_is_fine() {
        let issues = run_logic_checks(&program(
            "while True:\n    if ready():\n        break\n",
            Language::Python,
        ));
        assert!(issues.iter().all(|issue| !issue.is_error()));
    }

    #[test]
    fn test_python_for_loops_never_flagged() {
        let issues = run_logic_checks(&program(
            "for item in items:\n    print(item)\n",
            Language::Python,
        ));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_c_style_for_without_condition() {
        let c = program("void f() {\n  for (;;) {\n    g();\n  }\n}\n", Language::C);
        assert!(run_logic_checks(&c).iter().any(LogicIssue::is_error));

        let js = program("function f() {\n  for (;;) { g(); }\n}\n", Language::JavaScript);
        assert!(run_logic_checks(&js).iter().any(LogicIssue::is_error));

        let bounded = program(
            "function f(n) {\n  for (let i = 0; i < n; i++) { g(i); }\n}\n",
            Language::JavaScript,
        );
        assert!(!run_logic_checks(&bounded).iter().any(LogicIssue::is_error));
    }

    #[test]
    fn test_go_loops() {
        let forever = program(
            "package main\n\nfunc f() {\n\tfor {\n\t\tg()\n\t}\n}\n",
            Language::Go,
        );
        let issues = run_logic_checks(&forever);
        assert_eq!(issues.iter().find(|i| i.is_error()).map(|i| i.line), Some(4));

        let ranged = program(
            "package main\n\nfunc f(xs []int) {\n\tfor _, x := range xs {\n\t\tg(x)\n\t}\n}\n",
            Language::Go,
        );
        assert!(!run_logic_checks(&ranged).iter().any(LogicIssue::is_error));
    }

    #[test]
    fn test_java_while_one() {
        let java = program(
            "class A {\n  void f() {\n    while (true) {\n      g();\n    }\n  }\n}\n",
            Language::Java,
        );
        assert!(run_logic_checks(&java).iter().any(LogicIssue::is_error));
    }

    #[test]
    fn test_unreachable_after_return() {
        let issues = run_logic_checks(&program(
            "def f(x):\n    return x\n    print(x)\n",
            Language::Python,
        ));
        let issue = issues
            .iter()
            .find(|issue| issue.message == UNREACHABLE_MESSAGE)
            .expect("unreachable");
        assert_eq!(issue.line, 3);
    }

    #[test]
    fn test_braceless_else_is_not_unreachable() {
        let issues = run_logic_checks(&program(
            "int f(int x) {\n  if (x) return 1;\n  else return 2;\n}\n",
            Language::C,
        ));
        assert!(!messages(&issues).contains(&UNREACHABLE_MESSAGE));
    }

    #[test]
    fn test_unused_variables() {
        let code = "def f():\n    total = 0\n    alpha = 1\n    i = 2\n    _skip = 3\n    return total\n";
        let issues = run_logic_checks(&program(code, Language::Python));
        let issue = issues
            .iter()
            .find(|issue| issue.message.starts_with("Unused variables"))
            .expect("unused");
        assert_eq!(issue.message, "Unused variables detected: alpha.");
        assert_eq!(issue.line, 3);
    }

    #[test]
    fn test_unused_names_are_sorted_and_capped() {
        let code = "let f = 1;\nlet e = 1;\nlet d = 1;\nlet c = 1;\nlet b = 1;\nlet a = 1;\n";
        let (names, line) = unused_variables(code).expect("unused");
        assert_eq!(names, ["a", "b", "c", "d", "e"]);
        assert_eq!(line, 6);
    }

    #[test]
    fn test_empty_handlers() {
        let python = "try:\n    f()\nexcept ValueError:\n    pass\n";
        assert_eq!(empty_exception_handler(python, Language::Python), Some(3));

        let java = "try {\n  f();\n} catch (Exception e) {\n  // ignored\n}\n";
        assert_eq!(empty_exception_handler(java, Language::Java), Some(3));

        let handled = "try { f(); } catch (Exception e) { log(e); }";
        assert_eq!(empty_exception_handler(handled, Language::Java), None);
    }

    #[test]
    fn test_missing_return_path() {
        let python = "def sign(x):\n    if x > 0:\n        return 1\n    x = -x\n";
        let issues = run_logic_checks(&program(python, Language::Python));
        assert!(messages(&issues).contains(&MISSING_RETURN_MESSAGE));

        let complete = "def sign(x):\n    if x > 0:\n        return 1\n    return -1\n";
        let issues = run_logic_checks(&program(complete, Language::Python));
        assert!(!messages(&issues).contains(&MISSING_RETURN_MESSAGE));

        let go = "package main\n\nfunc sign(x int) int {\n\tif x > 0 {\n\t\treturn 1\n\t}\n\treturn -1\n}\n";
        let issues = run_logic_checks(&program(go, Language::Go));
        assert!(!messages(&issues).contains(&MISSING_RETURN_MESSAGE));

        let c = "int sign(int x) {\n  if (x > 0) {\n    return 1;\n  }\n  x = -x;\n}\n";
        let issues = run_logic_checks(&program(c, Language::C));
        let issue = issues
            .iter()
            .find(|issue| issue.message == MISSING_RETURN_MESSAGE)
            .expect("missing return");
        assert_eq!(issue.line, 1);
    }

    #[test]
    fn test_text_strategy_checks() {
        let looping = text_program("while(1) {\n  step();\n}\n", Language::C);
        assert_eq!(
            run_logic_checks(&looping)
                .iter()
                .find(|issue| issue.is_error())
                .map(|issue| issue.line),
            Some(1)
        );

        let escaping = text_program("while(1) {\n  break;\n}\n", Language::C);
        assert!(!run_logic_checks(&escaping).iter().any(LogicIssue::is_error));

        // Tree-only checks stay silent without a tree
        let unreachable = text_program("def f(x):\n    return x\n    print(x)\n", Language::Python);
        assert!(!messages(&run_logic_checks(&unreachable)).contains(&UNREACHABLE_MESSAGE));
    }
}
