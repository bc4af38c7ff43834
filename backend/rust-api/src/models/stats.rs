use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Session;

/// Aggregate counters across every session held by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestStats {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// Mean score per key (`grapheme`, `number`, `sound`, `overall`).
    /// Zero scores are left out of the mean, keys with no data are omitted.
    pub average_scores: BTreeMap<String, f64>,
}

impl TestStats {
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut stats = TestStats::default();
        let mut sums: BTreeMap<&'static str, (u64, u64)> = BTreeMap::new();

        for session in sessions {
            stats.total_sessions += 1;
            if session.is_completed() {
                stats.completed_sessions += 1;
            }

            let Some(scores) = &session.scores else {
                continue;
            };
            for (key, score) in scores.entries() {
                if score == 0 {
                    continue;
                }
                let entry = sums.entry(key).or_insert((0, 0));
                entry.0 += u64::from(score);
                entry.1 += 1;
            }
        }

        stats.average_scores = sums
            .into_iter()
            .map(|(key, (sum, count))| (key.to_string(), sum as f64 / count as f64))
            .collect();
        stats
    }
}
