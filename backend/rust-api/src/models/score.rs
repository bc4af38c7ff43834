use serde::{Deserialize, Serialize};

/// Qualitative reliability of a score. Ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Confidence {
    pub fn is_high(&self) -> bool {
        *self >= Confidence::High
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Consistency score in `0..=100`
    pub score: u8,
    pub confidence: Confidence,
    pub interpretation: String,
    pub dominant_colors: Vec<String>,
}

impl ScoreResult {
    /// Zero score with no colors. Used for insufficient or missing data,
    /// which is a valid outcome rather than an error.
    pub fn degenerate(interpretation: &str) -> Self {
        Self {
            score: 0,
            confidence: Confidence::Low,
            interpretation: interpretation.to_string(),
            dominant_colors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_total_order() {
        assert!(Confidence::Low < Confidence::Moderate);
        assert!(Confidence::Moderate < Confidence::High);
        assert!(Confidence::High < Confidence::VeryHigh);
        assert!(Confidence::VeryHigh.is_high());
        assert!(!Confidence::Moderate.is_high());
    }

    #[test]
    fn test_score_result_wire_format() {
        let result = ScoreResult {
            score: 91,
            confidence: Confidence::VeryHigh,
            interpretation: "stable".into(),
            dominant_colors: vec!["#FF6B6B".into()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["confidence"], "very-high");
        assert_eq!(json["dominantColors"][0], "#FF6B6B");
    }
}
