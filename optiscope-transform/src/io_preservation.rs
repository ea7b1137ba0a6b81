//! Python I/O preservation
//!
//! A rewrite must keep reading what the original read and printing what it
//! printed. Lost `input(` and `print(` lines are re-appended, and a rewrite
//! that only returns values gets an execution footer.

use lazy_static::lazy_static;
use optiscope_core::python::{has_main_guard_text, returns_without_print, PythonModule};
use regex::Regex;
use tracing::debug;

pub const INPUT_PRESERVED: &str = "Preserved input() behavior from original code.";
pub const PRINT_PRESERVED: &str = "Preserved print() behavior from original code.";
pub const PRINT_FALLBACK: &str = "Added executable print fallback for return-only code.";

const WRAPPER_BANNER: &str = "# --- Auto Execution Wrapper ---";
const DEFAULT_INPUT: &str = "nums = list(map(int, input().split()))";

lazy_static! {
    static ref INPUT_CALL: Regex = Regex::new(r"\binput\s*\(").unwrap();
    static ref PRINT_CALL: Regex = Regex::new(r"\bprint\s*\(").unwrap();
    static ref ASSIGNMENT: Regex = Regex::new(r"^([A-Za-z_]\w*)\s*=\s*(.+)$").unwrap();
}

fn lines_matching(code: &str, pattern: &Regex) -> Vec<String> {
    code.lines()
        .filter(|line| pattern.is_match(line))
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Arguments of the first `print(FN(...))` in `original`
fn printed_call_args(original: &str, function: &str) -> Option<String> {
    let pattern = Regex::new(&format!(
        r"print\s*\(\s*{}\s*\((.*?)\)\s*\)",
        regex::escape(function)
    ))
    .ok()?;
    let args = pattern.captures(original)?.get(1)?.as_str().trim();
    (!args.is_empty()).then(|| args.to_string())
}

/// First `NAME = ...input(...)...` statement in `original`, as `(NAME, statement)`
fn input_assignment(original: &str) -> Option<(String, String)> {
    original
        .lines()
        .filter(|line| line.contains("input("))
        .find_map(|line| {
            let statement = line.trim();
            ASSIGNMENT
                .captures(statement)
                .and_then(|caps| caps.get(1))
                .map(|name| (name.as_str().to_string(), statement.to_string()))
        })
}

/// Append an `if __name__ == '__main__':` footer that prints the first
/// function's result.
///
/// `code` comes back unchanged when it does not parse, already prints, never
/// returns, defines no function, already has a main guard, or when the
/// footer would break the parse.
pub fn inject_print_fallback(code: &str, original: &str) -> String {
    let Some(module) = PythonModule::parse(code) else {
        return code.to_string();
    };
    if module.has_print() || !module.has_return() {
        return code.to_string();
    }
    let Some(function) = module.first_function() else {
        return code.to_string();
    };
    if has_main_guard_text(code) {
        return code.to_string();
    }

    let params = module.parameter_names(&function);
    let assignment = input_assignment(original);

    let call = if let Some(args) = printed_call_args(original, &function) {
        format!("{function}({args})")
    } else if params.len() <= 1 {
        match &assignment {
            Some((variable, _)) => format!("{function}({variable})"),
            None => format!("{function}(nums)"),
        }
    } else {
        format!("{function}(*nums)")
    };

    let setup = assignment.map_or_else(|| DEFAULT_INPUT.to_string(), |(_, statement)| statement);
    let footer = [
        String::new(),
        WRAPPER_BANNER.to_string(),
        "if __name__ == '__main__':".to_string(),
        format!("    {setup}"),
        format!("    print({call})"),
    ];

    let candidate = format!("{}\n{}\n", code.trim_end(), footer.join("\n"));
    if PythonModule::parse(&candidate).is_some() {
        candidate
    } else {
        debug!("Print fallback footer did not parse; dropped");
        code.to_string()
    }
}

/// Carry the original's input and output behaviour over to `rewrite`.
///
/// Returns the adjusted text and a note per preservation step taken. A
/// rewrite that does not parse is returned untouched.
pub fn preserve_io(original: &str, rewrite: &str) -> (String, Vec<String>) {
    let mut notes = Vec::new();
    let Some(rewritten) = PythonModule::parse(rewrite) else {
        return (rewrite.to_string(), notes);
    };
    let source = PythonModule::parse(original);
    let original_inputs = source.as_ref().is_some_and(PythonModule::has_input);
    let original_prints = source.as_ref().is_some_and(PythonModule::has_print);

    let mut extra_lines: Vec<String> = Vec::new();

    if original_inputs && !rewritten.has_input() {
        let missing: Vec<String> = lines_matching(original, &INPUT_CALL)
            .into_iter()
            .filter(|line| !rewrite.contains(line.as_str()))
            .collect();
        if !missing.is_empty() {
            notes.push(INPUT_PRESERVED.to_string());
            extra_lines.extend(missing);
        }
    }

    if original_prints && !rewritten.has_print() {
        let missing: Vec<String> = lines_matching(original, &PRINT_CALL)
            .into_iter()
            .filter(|line| !rewrite.contains(line.as_str()))
            .collect();
        if !missing.is_empty() {
            notes.push(PRINT_PRESERVED.to_string());
            extra_lines.extend(missing);
        }
    }

    let mut text = if extra_lines.is_empty() {
        rewrite.to_string()
    } else {
        format!("{}\n\n{}\n", rewrite.trim_end(), extra_lines.join("\n"))
    };

    if returns_without_print(&text) {
        let injected = inject_print_fallback(&text, original);
        if injected != text {
            text = injected;
            notes.push(PRINT_FALLBACK.to_string());
        }
    }

    (text, notes)
}
