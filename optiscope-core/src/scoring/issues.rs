//! Program-level findings for Python snippets

use crate::constants::SuggestionThresholds;
use crate::language::Language;
use crate::python::PythonModule;

pub const NO_ENTRY_POINT: &str = "No execution entry point detected.";
pub const NO_OUTPUT: &str = "Program may not produce any output.";

fn never_called(name: &str) -> String {
    format!("Function '{name}' is defined but never called.")
}

/// Never-called functions, a missing entry point and silent programs.
///
/// Other languages, and Python that does not parse, yield nothing.
pub fn extra_issues(code: &str, language: Language) -> Vec<String> {
    if language != Language::Python {
        return Vec::new();
    }
    let Some(module) = PythonModule::parse(code) else {
        return Vec::new();
    };

    let defined = module.defined_functions();
    let called = module.call_names();

    let mut issues: Vec<String> = defined
        .iter()
        .filter(|name| !called.contains(*name))
        .map(|name| never_called(name))
        .collect();

    if !defined.is_empty() && !module.has_top_level_call_to(&defined) {
        issues.push(NO_ENTRY_POINT.to_string());
    }

    let has_input = called.contains("input");
    let has_print = called.contains("print");
    if !has_input && !has_print && !module.has_main_block() {
        issues.push(NO_OUTPUT.to_string());
    }

    issues.truncate(SuggestionThresholds::MAX_EXTRA_ISSUES);
    issues
}
