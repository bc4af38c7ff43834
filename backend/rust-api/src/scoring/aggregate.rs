use std::collections::BTreeMap;

use super::Tally;
use crate::models::{Confidence, Modality, ScoreResult};

pub const MAX_OVERALL_COLORS: usize = 5;

/// Per-modality score at or above which a modality counts as strong evidence.
pub const STRONG_SCORE: u8 = 70;

pub const NO_VALID_DATA: &str = "No valid test data available for analysis.";

const MIXED: &str = "Mixed results suggest possible synesthetic tendencies. \
     Some color associations may be genuine, but further testing recommended.";
const NO_EVIDENCE: &str = "Results do not strongly indicate synesthetic experiences. \
     Color associations appear to be based on learned or cultural factors rather than perceptual experiences.";

/// Combines per-modality results into the overall verdict.
///
/// Modalities scoring 0 are treated exactly like absent ones, so a skipped
/// test and an attempted test with no signal cannot be told apart here.
pub fn aggregate(per_modality: &BTreeMap<Modality, ScoreResult>) -> ScoreResult {
    let valid: Vec<(Modality, &ScoreResult)> = per_modality
        .iter()
        .filter(|(_, result)| result.score > 0)
        .map(|(modality, result)| (*modality, result))
        .collect();

    if valid.is_empty() {
        return ScoreResult::degenerate(NO_VALID_DATA);
    }

    let total: u32 = valid.iter().map(|(_, result)| u32::from(result.score)).sum();
    let score = (f64::from(total) / valid.len() as f64).round() as u8;

    let mut colors = Tally::default();
    for (_, result) in &valid {
        for color in &result.dominant_colors {
            colors.add(color);
        }
    }

    let high_count = valid
        .iter()
        .filter(|(_, result)| result.confidence.is_high())
        .count();
    let confidence = if high_count >= 2 {
        Confidence::VeryHigh
    } else if high_count >= 1 || valid.len() >= 2 {
        Confidence::High
    } else {
        Confidence::Moderate
    };

    let strong: Vec<Modality> = valid
        .iter()
        .filter(|(_, result)| result.score >= STRONG_SCORE)
        .map(|(modality, _)| *modality)
        .collect();

    let interpretation = match strong.as_slice() {
        [] if score >= 50 => MIXED.to_string(),
        [] => NO_EVIDENCE.to_string(),
        [only] => format!(
            "Evidence suggests synesthetic experiences, particularly in {} associations. \
             Consider further testing for comprehensive evaluation.",
            only
        ),
        _ => {
            let tested: Vec<&str> = per_modality.keys().map(Modality::as_str).collect();
            format!(
                "Strong evidence for multiple types of synesthesia across {} tests. \
                 Your consistent responses suggest genuine synesthetic experiences.",
                tested.join(", ")
            )
        }
    };

    ScoreResult {
        score,
        confidence,
        interpretation,
        dominant_colors: colors.top(MAX_OVERALL_COLORS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::consistency::band;

    fn result(score: u8, colors: &[&str]) -> ScoreResult {
        let (confidence, interpretation) = band(score);
        ScoreResult {
            score,
            confidence,
            interpretation: interpretation.to_string(),
            dominant_colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn mapping(entries: &[(Modality, ScoreResult)]) -> BTreeMap<Modality, ScoreResult> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_empty_mapping_is_degenerate() {
        let overall = aggregate(&BTreeMap::new());
        assert_eq!(overall, ScoreResult::degenerate(NO_VALID_DATA));
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(0, &[])),
            (Modality::Sound, result(0, &[])),
        ]));
        assert_eq!(overall.score, 0);
        assert_eq!(overall.confidence, Confidence::Low);
        assert!(overall.dominant_colors.is_empty());
    }

    #[test]
    fn test_zero_scores_are_filtered() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(80, &["red"])),
            (Modality::Number, result(60, &["blue"])),
            (Modality::Sound, result(0, &[])),
        ]));
        assert_eq!(overall.score, 70);
        assert_eq!(overall.confidence, Confidence::High);
        assert!(overall.interpretation.contains("particularly in grapheme"));
    }

    #[test]
    fn test_single_moderate_modality() {
        let overall = aggregate(&mapping(&[(Modality::Number, result(55, &["blue"]))]));
        assert_eq!(overall.score, 55);
        assert_eq!(overall.confidence, Confidence::Moderate);
        assert_eq!(overall.interpretation, MIXED);
    }

    #[test]
    fn test_two_weak_modalities_are_high_confidence() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(20, &[])),
            (Modality::Sound, result(35, &[])),
        ]));
        assert_eq!(overall.score, 28);
        assert_eq!(overall.confidence, Confidence::High);
        assert_eq!(overall.interpretation, NO_EVIDENCE);
    }

    #[test]
    fn test_two_strong_modalities() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(90, &["red", "blue"])),
            (Modality::Number, result(0, &[])),
            (Modality::Sound, result(72, &["blue", "green"])),
        ]));
        assert_eq!(overall.score, 81);
        assert_eq!(overall.confidence, Confidence::VeryHigh);
        assert!(overall
            .interpretation
            .contains("across grapheme, number, sound tests"));
        assert_eq!(overall.dominant_colors, vec!["blue", "red", "green"]);
    }

    #[test]
    fn test_overall_colors_capped_at_five() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(90, &["a", "b", "c"])),
            (Modality::Number, result(90, &["d", "e", "f"])),
            (Modality::Sound, result(90, &["c", "g", "h"])),
        ]));
        assert_eq!(overall.dominant_colors, vec!["c", "a", "b", "d", "e"]);
    }

    #[test]
    fn test_rounding_half_up() {
        let overall = aggregate(&mapping(&[
            (Modality::Grapheme, result(71, &[])),
            (Modality::Number, result(72, &[])),
        ]));
        assert_eq!(overall.score, 72);
    }

    #[test]
    fn test_monotonic_in_modality_score() {
        let mut previous = 0;
        for grapheme in 1..=100u8 {
            let overall = aggregate(&mapping(&[
                (Modality::Grapheme, result(grapheme, &[])),
                (Modality::Sound, result(40, &[])),
            ]));
            assert!(overall.score >= previous);
            previous = overall.score;
        }
    }
}
