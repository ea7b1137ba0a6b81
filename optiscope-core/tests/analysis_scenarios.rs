use optiscope_core::{
    AnalysisResult, Analyzer, BigO, ErrorKind, Language, NoTreeProvider, Validator,
};
use proptest::prelude::*;
use std::sync::Arc;

fn analyze(code: &str) -> Result<AnalysisResult, Box<dyn std::error::Error>> {
    Ok(Analyzer::new().analyze(code, Some("python"))?)
}

#[test]
fn test_syntax_error_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let result = analyze("def broken(:\n    return 1")?;
    let error = result.error().ok_or("expected a rejection")?;
    assert_eq!(error.error_type, ErrorKind::Syntax);

    let payload = serde_json::to_value(&result)?;
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_type"], "syntax");
    Ok(())
}

#[test]
fn test_infinite_loop_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let result = analyze("def f():\n    while True:\n        x = 1\n")?;
    let error = result.error().ok_or("expected a rejection")?;
    assert_eq!(error.error_type, ErrorKind::Logic);
    assert_eq!(error.line, 2);
    Ok(())
}

#[test]
fn test_never_called_function_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let result = analyze("def three_sum_n3(nums):\n    return []\n")?;
    let report = result.report().ok_or("expected success")?;
    println!("extra issues: {:?}", report.extra_issues);

    assert!(report
        .extra_issues
        .contains(&"Function 'three_sum_n3' is defined but never called.".to_string()));
    assert!(report
        .extra_issues
        .contains(&"No execution entry point detected.".to_string()));
    assert!(report
        .suggestions
        .contains(&"Output not printed - add print statement.".to_string()));
    Ok(())
}

#[test]
fn test_called_function_has_no_entry_point_issue() -> Result<(), Box<dyn std::error::Error>> {
    let result = analyze("def main():\n    print('ok')\n\nmain()\n")?;
    let report = result.report().ok_or("expected success")?;
    assert!(report.extra_issues.is_empty());
    Ok(())
}

#[test]
fn test_brute_force_three_sum_is_cubic() -> Result<(), Box<dyn std::error::Error>> {
    let code = "def three_sum(nums):\n    result = []\n    n = len(nums)\n    for i in range(n):\n        for j in range(i + 1, n):\n            for k in range(j + 1, n):\n                if nums[i] + nums[j] + nums[k] == 0:\n                    triplet = sorted([nums[i], nums[j], nums[k]])\n                    if triplet not in result:\n                        result.append(triplet)\n    return result\n\nprint(three_sum([-1, 0, 1, 2, -1, -4]))\n";
    let result = analyze(code)?;
    let report = result.report().ok_or("expected success")?;
    assert_eq!(report.complexity, BigO::Cubic);
    assert_eq!(report.metrics.nesting_depth, 3);
    assert!((report.scores.efficiency - 35.0).abs() < 1e-9);

    let payload = serde_json::to_value(&result)?;
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["complexity"], "O(n^3)");
    Ok(())
}

#[test]
fn test_every_language_analyzes() -> Result<(), Box<dyn std::error::Error>> {
    let samples = [
        ("python", "def f(xs):\n    return sum(xs)\n\nprint(f([1]))\n"),
        ("c", "int f(int n) {\n  return n * 2;\n}\n"),
        ("cpp", "#include <vector>\nint f(std::vector<int> v) {\n  int s = 0;\n  for (int x : v) { s += x; }\n  return s;\n}\n"),
        ("java", "public class A {\n  static int f(int[] xs) {\n    int s = 0;\n    for (int x : xs) { s += x; }\n    return s;\n  }\n}\n"),
        ("javascript", "function f(xs) {\n  let s = 0;\n  for (const x of xs) { s += x; }\n  return s;\n}\n"),
        ("go", "package main\n\nfunc f(xs []int) int {\n\ts := 0\n\tfor _, x := range xs {\n\t\ts += x\n\t}\n\treturn s\n}\n"),
    ];

    for (language, code) in samples {
        let result = Analyzer::new().analyze(code, Some(language))?;
        println!("{language}: {result:?}");
        assert!(result.is_success(), "{language} snippet was rejected");
    }
    Ok(())
}

#[test]
fn test_degraded_text_strategy() -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Analyzer::with_provider(Arc::new(NoTreeProvider));
    let result = analyzer.analyze(
        "int f(int n) {\n  int s = 0;\n  for (int i = 0; i < n; i++) {\n    for (int j = 0; j < n; j++) { s += j; }\n  }\n  return s;\n}\n",
        Some("c"),
    )?;
    assert_eq!(result.report().map(|r| r.complexity), Some(BigO::Quadratic));
    Ok(())
}

proptest! {
    #[test]
    fn test_unbalanced_brackets_report_first_negative_line(
        prefix in proptest::collection::vec("[a-z]{1,6} = [0-9]{1,3}", 0..6),
    ) {
        let mut code = prefix.join("\n");
        if !code.is_empty() {
            code.push('\n');
        }
        code.push_str("x = 1)\ny = (2\n");

        let validator = Validator::new(Arc::new(NoTreeProvider));
        match validator.parse(&code, Language::Python) {
            Err(optiscope_core::Error::Syntax { line, .. }) => {
                prop_assert_eq!(line, prefix.len() + 1);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    #[test]
    fn test_scores_are_bounded_and_averaged(
        loops in 0usize..4,
        branches in 0usize..4,
        comments in 0usize..3,
    ) {
        let mut code = String::from("def work(values):\n    total = 0\n");
        let mut indent = String::from("    ");
        for depth in 0..loops {
            code.push_str(&format!("{indent}for v{depth} in values:\n"));
            indent.push_str("    ");
        }
        for branch in 0..branches {
            code.push_str(&format!("{indent}if total > {branch}:\n{indent}    total -= 1\n"));
        }
        code.push_str(&format!("{indent}total += 1\n"));
        for _ in 0..comments {
            code.push_str("    # keep a running total\n");
        }
        code.push_str("    return total\n\nprint(work([1, 2, 3]))\n");

        let result = Analyzer::new().analyze(&code, Some("python")).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let report = result.report().ok_or_else(|| TestCaseError::fail("rejected"))?;
        let scores = report.scores;
        for value in [scores.readability, scores.maintainability, scores.efficiency, scores.safety, scores.overall] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
        let mean = (scores.readability + scores.maintainability + scores.efficiency + scores.safety) / 4.0;
        prop_assert!((scores.overall - (mean * 100.0).round() / 100.0).abs() < 1e-9);
        prop_assert!(report.metrics.cyclomatic_complexity >= 1);
        prop_assert!((0.0..=1.0).contains(&report.metrics.comment_ratio));
        prop_assert_eq!(report.metrics.nesting_depth, loops);
    }
}
