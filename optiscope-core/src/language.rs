//! Supported languages and their parse-tree node tables
//!
//! Each language is described by data, not by a parser subclass: a
//! [`NodeRules`] table lists the exact node kinds that count as functions,
//! loops, conditionals and comments for that grammar.

use serde::{Deserialize, Serialize};

/// Languages the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    C,
    Cpp,
    Java,
    JavaScript,
    Go,
}

/// Node kinds counted by the feature extractor and classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRules {
    pub functions: &'static [&'static str],
    pub loops: &'static [&'static str],
    pub conditionals: &'static [&'static str],
    pub comments: &'static [&'static str],
}

impl NodeRules {
    pub fn is_function(&self, kind: &str) -> bool {
        self.functions.contains(&kind)
    }

    pub fn is_loop(&self, kind: &str) -> bool {
        self.loops.contains(&kind)
    }

    pub fn is_conditional(&self, kind: &str) -> bool {
        self.conditionals.contains(&kind)
    }

    pub fn is_comment(&self, kind: &str) -> bool {
        self.comments.contains(&kind)
    }
}

const COMMENT_KINDS: &[&str] = &["comment", "line_comment", "block_comment"];

const PYTHON_RULES: NodeRules = NodeRules {
    functions: &["function_definition", "lambda"],
    loops: &["for_statement", "while_statement"],
    conditionals: &["if_statement", "elif_clause"],
    comments: COMMENT_KINDS,
};

const C_RULES: NodeRules = NodeRules {
    functions: &["function_definition"],
    loops: &["for_statement", "while_statement", "do_statement"],
    conditionals: &["if_statement", "switch_statement", "case_statement"],
    comments: COMMENT_KINDS,
};

const CPP_RULES: NodeRules = NodeRules {
    functions: &["function_definition", "lambda_expression"],
    loops: &["for_statement", "for_range_loop", "while_statement", "do_statement"],
    conditionals: &["if_statement", "switch_statement", "case_statement"],
    comments: COMMENT_KINDS,
};

const JAVA_RULES: NodeRules = NodeRules {
    functions: &["method_declaration", "constructor_declaration"],
    loops: &[
        "for_statement",
        "enhanced_for_statement",
        "while_statement",
        "do_statement",
    ],
    conditionals: &[
        "if_statement",
        "switch_expression",
        "switch_block_statement_group",
    ],
    comments: COMMENT_KINDS,
};

const JAVASCRIPT_RULES: NodeRules = NodeRules {
    functions: &[
        "function_declaration",
        "function",
        "method_definition",
        "arrow_function",
    ],
    loops: &[
        "for_statement",
        "for_in_statement",
        "while_statement",
        "do_statement",
    ],
    conditionals: &["if_statement", "switch_statement", "ternary_expression"],
    comments: COMMENT_KINDS,
};

const GO_RULES: NodeRules = NodeRules {
    functions: &["function_declaration", "method_declaration", "func_literal"],
    loops: &["for_statement"],
    conditionals: &[
        "if_statement",
        "expression_switch_statement",
        "type_switch_statement",
        "select_statement",
    ],
    comments: COMMENT_KINDS,
};

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::JavaScript,
        Language::Go,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Go => "go",
        }
    }

    /// Node-kind table for this language
    pub fn rules(&self) -> &'static NodeRules {
        match self {
            Language::Python => &PYTHON_RULES,
            Language::C => &C_RULES,
            Language::Cpp => &CPP_RULES,
            Language::Java => &JAVA_RULES,
            Language::JavaScript => &JAVASCRIPT_RULES,
            Language::Go => &GO_RULES,
        }
    }

    /// Grammar backing the default tree provider
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::language(),
            Language::C => tree_sitter_c::language(),
            Language::Cpp => tree_sitter_cpp::language(),
            Language::Java => tree_sitter_java::language(),
            Language::JavaScript => tree_sitter_javascript::language(),
            Language::Go => tree_sitter_go::language(),
        }
    }

    /// Python blocks are delimited by indentation; everything else uses braces.
    pub fn uses_braces(&self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "c" => Ok(Language::C),
            "cpp" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "javascript" => Ok(Language::JavaScript),
            "go" => Ok(Language::Go),
            _ => Err(crate::Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// Resolve the language of a snippet.
///
/// A declared name is trusted when it is supported; otherwise the text is
/// sniffed for telltale markers, defaulting to Python.
pub fn detect_language(code: &str, declared: Option<&str>) -> Language {
    if let Some(language) = declared.and_then(|name| name.parse::<Language>().ok()) {
        return language;
    }

    let text = code.trim();
    if text.starts_with("package main") || text.contains("func ") {
        return Language::Go;
    }
    if text.contains("#include") {
        if text.contains("std::") || text.contains("cout") {
            return Language::Cpp;
        }
        return Language::C;
    }
    if text.contains("public class") {
        return Language::Java;
    }
    if text.contains("function ") || text.contains("=>") || text.contains("console.") {
        return Language::JavaScript;
    }
    Language::Python
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_names() {
        assert_eq!(" Python ".parse::<Language>().ok(), Some(Language::Python));
        assert_eq!("CPP".parse::<Language>().ok(), Some(Language::Cpp));
        assert!(matches!(
            "rust".parse::<Language>(),
            Err(crate::Error::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_declared_language_is_trusted() {
        assert_eq!(
            detect_language("func main() {}", Some("java")),
            Language::Java
        );
    }

    #[test]
    fn test_language_sniffing() {
        assert_eq!(detect_language("package main\n", None), Language::Go);
        assert_eq!(
            detect_language("#include <iostream>\nint main(){ std::cout << 1; }", None),
            Language::Cpp
        );
        assert_eq!(
            detect_language("#include <stdio.h>\nint main(){}", None),
            Language::C
        );
        assert_eq!(
            detect_language("public class A {}", Some("kotlin")),
            Language::Java
        );
        assert_eq!(
            detect_language("const f = (x) => x;", None),
            Language::JavaScript
        );
        assert_eq!(detect_language("x = 1", None), Language::Python);
    }

    #[test]
    fn test_rules_use_exact_kinds() {
        let rules = Language::Go.rules();
        assert!(rules.is_loop("for_statement"));
        assert!(!rules.is_loop("range_clause"));
        assert!(Language::Python.rules().is_comment("comment"));
        assert!(!Language::Java.rules().is_function("function_definition"));
    }

    #[test]
    fn test_display_round_trips_names() {
        for language in Language::ALL {
            assert_eq!(language.to_string().parse::<Language>().ok(), Some(language));
        }
    }
}
