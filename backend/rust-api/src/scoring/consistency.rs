use std::collections::BTreeMap;

use super::Tally;
use crate::models::{Confidence, ResponseRecord, ScoreResult};

/// Below this many responses a modality is not scored.
pub const MIN_RESPONSES: usize = 5;

pub const MAX_DOMINANT_COLORS: usize = 3;

pub const INSUFFICIENT_DATA: &str = "Insufficient data for analysis";

const VERY_HIGH: &str = "Very high consistency suggests strong synesthetic associations. \
     Your responses show remarkable stability across repeated exposures.";
const HIGH: &str = "High consistency indicates likely synesthetic experiences. \
     Your color associations appear to be automatic and stable.";
const MODERATE: &str = "Moderate consistency suggests possible synesthetic tendencies. \
     Some color associations may be genuine, but results are mixed.";
const LOW: &str = "Low consistency indicates limited synesthetic associations. \
     Most responses appear to be based on learned or cultural associations.";
const VERY_LOW: &str = "Very low consistency suggests no significant synesthetic experiences. \
     Responses appear random or based on non-perceptual factors.";

/// Scores the responses of a single modality.
///
/// Each stimulus contributes the share of its color entries taken by its most
/// frequent color; the score is the mean share across answered stimuli,
/// scaled to 0..=100. A stimulus seen once scores a full 1.0.
pub fn score_modality(responses: &[ResponseRecord]) -> ScoreResult {
    if responses.len() < MIN_RESPONSES {
        return ScoreResult::degenerate(INSUFFICIENT_DATA);
    }

    let mut per_stimulus: BTreeMap<&str, Tally> = BTreeMap::new();
    let mut overall = Tally::default();

    for record in responses {
        let stimulus = per_stimulus.entry(record.stimulus.as_str()).or_default();
        for color in record.response.colors() {
            stimulus.add(color);
            overall.add(color);
        }
    }

    let ratios: Vec<f64> = per_stimulus
        .values()
        .filter(|tally| tally.total() > 0)
        .map(|tally| tally.max_count() as f64 / tally.total() as f64)
        .collect();

    // Only empty sound selections: nothing to measure.
    if ratios.is_empty() {
        return ScoreResult::degenerate(INSUFFICIENT_DATA);
    }

    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    let score = (mean * 100.0).round().clamp(0.0, 100.0) as u8;
    let (confidence, interpretation) = band(score);

    ScoreResult {
        score,
        confidence,
        interpretation: interpretation.to_string(),
        dominant_colors: overall.top(MAX_DOMINANT_COLORS),
    }
}

/// Maps a score onto its band. The two lowest bands share `Low` but carry
/// different messages.
pub fn band(score: u8) -> (Confidence, &'static str) {
    match score {
        85..=u8::MAX => (Confidence::VeryHigh, VERY_HIGH),
        70..=84 => (Confidence::High, HIGH),
        50..=69 => (Confidence::Moderate, MODERATE),
        30..=49 => (Confidence::Low, LOW),
        _ => (Confidence::Low, VERY_LOW),
    }
}
