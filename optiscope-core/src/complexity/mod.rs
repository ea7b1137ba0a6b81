//! Big-O classification
//!
//! The classifier maps a validated program onto the ordered [`BigO`] scale.
//! Known idioms are recognised first; otherwise the tree strategy combines
//! loop depth, self-recursion and doubling/halving updates, and the text
//! strategy falls back to counting loop-bearing lines.

pub mod patterns;

use crate::language::Language;
use crate::models::BigO;
use crate::tree::SyntaxNode;
use crate::validation::ParsedProgram;
use tracing::debug;

/// Signals gathered from a parse tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplexityFeatures {
    pub loop_count: usize,
    pub max_loop_depth: usize,
    pub has_log_loop: bool,
    pub has_binary_search: bool,
    pub recursion_branch_factor: usize,
}

impl ComplexityFeatures {
    pub fn to_big_o(self) -> BigO {
        if self.recursion_branch_factor >= 2 {
            return BigO::Exponential;
        }
        if self.has_binary_search {
            return BigO::Logarithmic;
        }
        BigO::from_loop_depth(self.max_loop_depth, self.has_log_loop)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ComplexityClassifier;

impl ComplexityClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, program: &ParsedProgram) -> BigO {
        let code = program.code.as_str();
        if patterns::is_sorted_two_pointer_triple_sum(code) {
            debug!("Matched sorted two-pointer triple-sum idiom");
            return BigO::Quadratic;
        }

        match &program.tree {
            Some(tree) => {
                let features = Self::tree_features(&tree.root, code, program.language);
                debug!("Complexity features: {:?}", features);
                features.to_big_o()
            }
            None => Self::text_big_o(code),
        }
    }

    pub fn tree_features(root: &SyntaxNode, code: &str, language: Language) -> ComplexityFeatures {
        let rules = language.rules();
        let mut features = ComplexityFeatures::default();

        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let mut next_depth = depth;
            if node.is_named && rules.is_loop(&node.kind) {
                features.loop_count += 1;
                next_depth += 1;
                features.max_loop_depth = features.max_loop_depth.max(next_depth);
            }

            if node.is_named && rules.is_function(&node.kind) {
                if let (Some(name), Some(body)) = (function_name(node, code), node.child_by_field("body")) {
                    let self_calls = patterns::call_count(&name, body.text(code));
                    features.recursion_branch_factor = features.recursion_branch_factor.max(self_calls);
                }
            }

            stack.extend(node.children.iter().map(|child| (child, next_depth)));
        }

        features.has_log_loop = patterns::has_log_update(code);
        features.has_binary_search = patterns::is_binary_search(code);
        features
    }

    fn text_big_o(code: &str) -> BigO {
        let recursive = patterns::defined_names(code)
            .iter()
            .any(|name| patterns::call_count(name, code) >= 3);
        if recursive {
            return BigO::Exponential;
        }
        if patterns::is_binary_search(code) {
            return BigO::Logarithmic;
        }

        match patterns::loop_line_count(code) {
            0 => BigO::Constant,
            1 if patterns::has_scaling_update(code) => BigO::Logarithmic,
            1 => BigO::Linear,
            2 => BigO::Quadratic,
            _ => BigO::Cubic,
        }
    }
}

/// Name of a function node: its `name` field, the C/C++ declarator chain, or
/// the first identifier-like child.
fn function_name(node: &SyntaxNode, code: &str) -> Option<String> {
    if let Some(name) = node.child_by_field("name") {
        return non_empty(name.text(code));
    }

    let mut declarator = node.child_by_field("declarator");
    while let Some(current) = declarator {
        match current.child_by_field("declarator") {
            Some(inner) => declarator = Some(inner),
            None => return non_empty(current.text(code)),
        }
    }

    node.children
        .iter()
        .filter(|child| {
            matches!(
                child.kind.as_str(),
                "identifier" | "field_identifier" | "type_identifier"
            )
        })
        .find_map(|child| non_empty(child.text(code)))
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NoTreeProvider, TreeSitterProvider};
    use crate::validation::Validator;
    use std::sync::Arc;

    fn classify(code: &str, language: Language) -> BigO {
        let program = Validator::new(Arc::new(TreeSitterProvider::new()))
            .parse(code, language)
            .expect("valid program");
        ComplexityClassifier::new().compute(&program)
    }

    fn classify_text(code: &str, language: Language) -> BigO {
        let program = Validator::new(Arc::new(NoTreeProvider))
            .parse(code, language)
            .expect("valid program");
        ComplexityClassifier::new().compute(&program)
    }

    #[test]
    fn test_constant() {
        assert_eq!(classify("def f(a):\n    return a[0]\n", Language::Python), BigO::Constant);
    }

    #[test]
    fn test_loop_depths() {
        let linear = "def f(a):\n    s = 0\n    for x in a:\n        s += x\n    return s\n";
        assert_eq!(classify(linear, Language::Python), BigO::Linear);

        let cubic = "def f(a):\n    for i in a:\n        for j in a:\n            for k in a:\n                print(i, j, k)\n";
        assert_eq!(classify(cubic, Language::Python), BigO::Cubic);

        let quartic = "for (int a = 0; a < n; a++)\n for (int b = 0; b < n; b++)\n  for (int c = 0; c < n; c++)\n   for (int d = 0; d < n; d++)\n    s++;\n";
        let code = format!("void f(int n) {{\n int s = 0;\n{quartic}}}\n");
        assert_eq!(classify(&code, Language::C), BigO::Polynomial(4));
    }

    #[test]
    fn test_log_loops() {
        let code = "int f(int n) {\n  int c = 0;\n  for (int i = 1; i < n; i *= 2) { c++; }\n  return c;\n}\n";
        assert_eq!(classify(code, Language::C), BigO::Logarithmic);

        let code = "package main\n\nfunc f(n int) int {\n\tc := 0\n\tfor i := 0; i < n; i++ {\n\t\tfor j := 1; j < n; j *= 2 {\n\t\t\tc++\n\t\t}\n\t}\n\treturn c\n}\n";
        assert_eq!(classify(code, Language::Go), BigO::Linearithmic);
    }

    #[test]
    fn test_recursion_is_exponential() {
        let code = "def fib(n):\n    if n <= 1:\n        return n\n    return fib(n - 1) + fib(n - 2)\n";
        assert_eq!(classify(code, Language::Python), BigO::Exponential);

        let code = "int fib(int n) {\n  if (n < 2) return n;\n  return fib(n - 1) + fib(n - 2);\n}\n";
        assert_eq!(classify(code, Language::C), BigO::Exponential);
    }

    #[test]
    fn test_binary_search() {
        let code = "function find(a, t) {\n  let left = 0, right = a.length - 1;\n  while (left <= right) {\n    const mid = (left + right) >> 1;\n    if (a[mid] === t) return mid;\n    if (a[mid] < t) left = mid + 1; else right = mid - 1;\n  }\n  return -1;\n}\n";
        assert_eq!(classify(code, Language::JavaScript), BigO::Logarithmic);
    }

    #[test]
    fn test_triple_sum_idiom() {
        let code = "def f(nums):\n    nums.sort()\n    n = len(nums)\n    out = []\n    for i in range(n - 2):\n        left, right = i + 1, n - 1\n        while left < right:\n            total = nums[i] + nums[left] + nums[right]\n            if total == 0:\n                out.append(total)\n                left += 1\n                right -= 1\n            elif total < 0:\n                left += 1\n            else:\n                right -= 1\n    return out\n";
        assert_eq!(classify(code, Language::Python), BigO::Quadratic);
        assert_eq!(classify_text(code, Language::Python), BigO::Quadratic);
    }

    #[test]
    fn test_text_strategy() {
        assert_eq!(classify_text("int x = 1;\n", Language::C), BigO::Constant);
        assert_eq!(
            classify_text("for (i = 0; i < n; i++) {\n  s += i;\n}\n", Language::C),
            BigO::Linear
        );
        assert_eq!(
            classify_text("while (n > 1) {\n  n /= 2;\n}\n", Language::C),
            BigO::Logarithmic
        );
        assert_eq!(
            classify_text("for (;;) {\n for (;;) {\n  break;\n }\n break;\n}\n", Language::C),
            BigO::Quadratic
        );
        let fib = "int fib(int n) {\n  if (n < 2) { return n; }\n  return fib(n - 1) + fib(n - 2);\n}\n";
        assert_eq!(classify_text(fib, Language::C), BigO::Exponential);
    }

    #[test]
    fn test_c_declarator_chain_name() {
        let code = "static int *walk(int n) {\n  return walk(n - 1) + walk(n - 2);\n}\n";
        let provider = TreeSitterProvider::new();
        let tree = crate::tree::TreeProvider::parse(&provider, Language::C, code).expect("tree");
        let function = tree
            .root
            .descendants()
            .into_iter()
            .find(|node| node.is_kind("function_definition"))
            .expect("function");
        assert_eq!(function_name(function, code).as_deref(), Some("walk"));
    }
}
