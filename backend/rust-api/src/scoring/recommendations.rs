use std::collections::BTreeMap;

use super::aggregate::STRONG_SCORE;
use crate::models::{Confidence, Modality, ScoreResult};

const HIGH_CONFIDENCE: [&str; 3] = [
    "Consider participating in synesthesia research studies to contribute to scientific understanding.",
    "Connect with synesthesia communities and organizations for support and information.",
    "Explore how your synesthetic experiences might enhance creativity in art, music, or writing.",
];

const MODERATE_CONFIDENCE: [&str; 2] = [
    "Retake the test in a few weeks to verify consistency of responses.",
    "Pay attention to your sensory experiences in daily life to better understand your perceptions.",
];

const LOW_SCORE: [&str; 2] = [
    "Learn more about synesthesia to understand this fascinating neurological phenomenon.",
    "While you may not have synesthesia, you can still appreciate the unique experiences of those who do.",
];

fn modality_tip(modality: Modality) -> &'static str {
    match modality {
        Modality::Grapheme => {
            "Your strong letter-color associations might be helpful for memory techniques and creative writing."
        }
        Modality::Sound => {
            "Your sound-color experiences could enhance musical appreciation and audio-visual art creation."
        }
        Modality::Number => {
            "Your number-color associations might assist with mathematical learning and numerical memory."
        }
    }
}

/// Builds the ordered recommendation list for a scored session.
///
/// Rules run in a fixed order and only append. Callers that show a prefix
/// of the list do so on their own.
pub fn recommend(overall: &ScoreResult, per_modality: &BTreeMap<Modality, ScoreResult>) -> Vec<String> {
    let mut recommendations: Vec<&'static str> = Vec::new();

    match overall.confidence {
        Confidence::High | Confidence::VeryHigh => recommendations.extend(HIGH_CONFIDENCE),
        Confidence::Moderate => recommendations.extend(MODERATE_CONFIDENCE),
        Confidence::Low => {}
    }

    if overall.score < 50 {
        recommendations.extend(LOW_SCORE);
    }

    recommendations.extend(
        per_modality
            .iter()
            .filter(|(_, result)| result.score >= STRONG_SCORE)
            .map(|(modality, _)| modality_tip(*modality)),
    );

    recommendations.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::aggregate;
    use crate::scoring::consistency::band;

    fn result(score: u8) -> ScoreResult {
        let (confidence, interpretation) = band(score);
        ScoreResult {
            score,
            confidence,
            interpretation: interpretation.to_string(),
            dominant_colors: vec![],
        }
    }

    #[test]
    fn test_strong_grapheme_and_sound() {
        let per_modality: BTreeMap<_, _> = [
            (Modality::Grapheme, result(88)),
            (Modality::Number, result(40)),
            (Modality::Sound, result(75)),
        ]
        .into_iter()
        .collect();
        let overall = aggregate(&per_modality);
        let recs = recommend(&overall, &per_modality);

        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], HIGH_CONFIDENCE[0]);
        assert_eq!(recs[3], modality_tip(Modality::Grapheme));
        assert_eq!(recs[4], modality_tip(Modality::Sound));
    }

    #[test]
    fn test_moderate_overall() {
        let per_modality: BTreeMap<_, _> = [(Modality::Number, result(60))].into_iter().collect();
        let overall = aggregate(&per_modality);
        assert_eq!(overall.confidence, Confidence::Moderate);

        let recs = recommend(&overall, &per_modality);
        assert_eq!(recs, MODERATE_CONFIDENCE.map(String::from).to_vec());
    }

    #[test]
    fn test_moderate_confidence_with_low_score() {
        let per_modality: BTreeMap<_, _> = [(Modality::Sound, result(20))].into_iter().collect();
        let overall = aggregate(&per_modality);
        let recs = recommend(&overall, &per_modality);

        assert_eq!(recs.len(), 4);
        assert_eq!(recs[2], LOW_SCORE[0]);
    }

    #[test]
    fn test_no_data() {
        let per_modality = BTreeMap::new();
        let overall = aggregate(&per_modality);
        assert_eq!(recommend(&overall, &per_modality), LOW_SCORE.map(String::from).to_vec());
    }
}
