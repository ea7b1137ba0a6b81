//! Big-O labels
//!
//! Labels form an ordered scale used both for display and for comparing
//! an original snippet against its rewrites. Generated polynomial labels
//! (degree four and up) sit past the end of the scale.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BigO {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Cubic,
    Exponential,
    /// `O(n^k)` for a loop nest of depth `k >= 4`
    Polynomial(u32),
    /// `O(n^k log n)` for a deep nest with a halving/doubling loop
    PolynomialLog(u32),
}

impl BigO {
    /// Rank of labels outside the fixed scale
    pub const UNRANKED: usize = 7;

    /// The fixed scale, cheapest first
    pub const SCALE: [BigO; 7] = [
        BigO::Constant,
        BigO::Logarithmic,
        BigO::Linear,
        BigO::Linearithmic,
        BigO::Quadratic,
        BigO::Cubic,
        BigO::Exponential,
    ];

    /// Position on the fixed scale; generated labels rank last
    pub fn rank(&self) -> usize {
        Self::SCALE
            .iter()
            .position(|label| label == self)
            .unwrap_or(Self::UNRANKED)
    }

    /// Classes whose growth makes them expensive at scale
    pub fn is_expensive(&self) -> bool {
        matches!(self, BigO::Quadratic | BigO::Cubic | BigO::Exponential)
    }

    /// Label for a loop nest of the given depth
    pub fn from_loop_depth(depth: usize, has_log_loop: bool) -> Self {
        let degree = u32::try_from(depth).unwrap_or(u32::MAX);
        match (depth, has_log_loop) {
            (0, _) => BigO::Constant,
            (1, true) => BigO::Logarithmic,
            (1, false) => BigO::Linear,
            (2, true) => BigO::Linearithmic,
            (2, false) => BigO::Quadratic,
            (3, _) => BigO::Cubic,
            (_, true) => BigO::PolynomialLog(degree - 1),
            (_, false) => BigO::Polynomial(degree),
        }
    }
}

impl std::fmt::Display for BigO {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BigO::Constant => write!(f, "O(1)"),
            BigO::Logarithmic => write!(f, "O(log n)"),
            BigO::Linear => write!(f, "O(n)"),
            BigO::Linearithmic => write!(f, "O(n log n)"),
            BigO::Quadratic => write!(f, "O(n^2)"),
            BigO::Cubic => write!(f, "O(n^3)"),
            BigO::Exponential => write!(f, "O(2^n)"),
            BigO::Polynomial(k) => write!(f, "O(n^{k})"),
            BigO::PolynomialLog(k) => write!(f, "O(n^{k} log n)"),
        }
    }
}

impl std::str::FromStr for BigO {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(label) = Self::SCALE.iter().find(|label| label.to_string() == trimmed) {
            return Ok(*label);
        }

        let inner = trimmed
            .strip_prefix("O(n^")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("Unrecognised complexity label: '{s}'"))?;
        let (degree, with_log) = match inner.strip_suffix(" log n") {
            Some(degree) => (degree, true),
            None => (inner, false),
        };
        let degree: u32 = degree
            .parse()
            .map_err(|_| format!("Unrecognised complexity label: '{s}'"))?;

        Ok(if with_log {
            BigO::PolynomialLog(degree)
        } else {
            BigO::Polynomial(degree)
        })
    }
}

impl Serialize for BigO {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BigO {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_order() {
        let ranks: Vec<usize> = BigO::SCALE.iter().map(BigO::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(BigO::Polynomial(4).rank(), BigO::UNRANKED);
        assert_eq!(BigO::PolynomialLog(3).rank(), BigO::UNRANKED);
    }

    #[test]
    fn test_loop_depth_labels() {
        assert_eq!(BigO::from_loop_depth(0, true), BigO::Constant);
        assert_eq!(BigO::from_loop_depth(1, true), BigO::Logarithmic);
        assert_eq!(BigO::from_loop_depth(2, false), BigO::Quadratic);
        assert_eq!(BigO::from_loop_depth(3, true), BigO::Cubic);
        assert_eq!(BigO::from_loop_depth(4, false).to_string(), "O(n^4)");
        assert_eq!(BigO::from_loop_depth(5, true).to_string(), "O(n^4 log n)");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&BigO::Linearithmic).unwrap();
        assert_eq!(json, "\"O(n log n)\"");
        let parsed: BigO = serde_json::from_str("\"O(n^6 log n)\"").unwrap();
        assert_eq!(parsed, BigO::PolynomialLog(6));
        assert!("O(n!)".parse::<BigO>().is_err());
    }

    proptest! {
        #[test]
        fn test_labels_parse_back(depth in 0usize..12, log in any::<bool>()) {
            let label = BigO::from_loop_depth(depth, log);
            prop_assert_eq!(label.to_string().parse::<BigO>(), Ok(label));
        }

        #[test]
        fn test_deeper_nests_never_rank_cheaper(depth in 0usize..10, log in any::<bool>()) {
            let shallow = BigO::from_loop_depth(depth, log);
            let deep = BigO::from_loop_depth(depth + 1, log);
            prop_assert!(deep.rank() >= shallow.rank());
        }
    }
}
