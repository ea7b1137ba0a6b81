use serde::{Deserialize, Serialize};

/// Structural counts extracted from one snippet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedFeatures {
    /// Non-blank lines, never below 1
    pub line_count: usize,
    pub loop_count: usize,
    pub nested_loop_depth: usize,
    pub function_count: usize,
    pub conditional_count: usize,
    /// `max(1, 1 + loops + conditionals)`
    pub cyclomatic_complexity: usize,
    /// Comments per non-blank line, four decimals, within `[0, 1]`
    pub comment_ratio: f64,
}

impl ParsedFeatures {
    /// Assemble features from raw counts, deriving the cyclomatic number and comment ratio
    pub fn from_counts(
        line_count: usize,
        loop_count: usize,
        nested_loop_depth: usize,
        function_count: usize,
        conditional_count: usize,
        comment_count: usize,
    ) -> Self {
        let line_count = line_count.max(1);
        let ratio = comment_count as f64 / line_count as f64;
        let comment_ratio = ((ratio * 10_000.0).round() / 10_000.0).clamp(0.0, 1.0);

        Self {
            line_count,
            loop_count,
            nested_loop_depth,
            function_count,
            conditional_count,
            cyclomatic_complexity: (1 + loop_count + conditional_count).max(1),
            comment_ratio,
        }
    }
}

/// Feature view exposed in analysis payloads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub lines_of_code: usize,
    pub functions: usize,
    pub loops: usize,
    pub nesting_depth: usize,
    pub cyclomatic_complexity: usize,
    pub comment_ratio: f64,
}

impl From<&ParsedFeatures> for Metrics {
    fn from(features: &ParsedFeatures) -> Self {
        Self {
            lines_of_code: features.line_count,
            functions: features.function_count,
            loops: features.loop_count,
            nesting_depth: features.nested_loop_depth,
            cyclomatic_complexity: features.cyclomatic_complexity,
            comment_ratio: features.comment_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let features = ParsedFeatures::from_counts(0, 2, 2, 1, 3, 0);
        assert_eq!(features.line_count, 1);
        assert_eq!(features.cyclomatic_complexity, 6);
        assert!(features.comment_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn test_comment_ratio_is_rounded_and_clamped() {
        let features = ParsedFeatures::from_counts(3, 0, 0, 0, 0, 1);
        assert!((features.comment_ratio - 0.3333).abs() < 1e-9);

        // Several comments on one line can outnumber lines
        let dense = ParsedFeatures::from_counts(1, 0, 0, 0, 0, 4);
        assert!((dense.comment_ratio - 1.0).abs() < f64::EPSILON);
    }
}
