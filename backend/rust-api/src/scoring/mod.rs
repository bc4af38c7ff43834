//! Consistency scoring engine.
//!
//! Pure, synchronous functions over already-loaded responses. Nothing in
//! here touches the store or the network.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Modality, ResponseRecord, ScoreResult};

pub mod aggregate;
pub mod consistency;
pub mod recommendations;

pub use aggregate::aggregate;
pub use consistency::{score_modality, MIN_RESPONSES};
pub use recommendations::recommend;

/// Scores every modality that has at least one response.
///
/// Modalities without responses are absent from the result, which the
/// aggregator treats the same as a zero score.
pub fn score_session(responses: &[ResponseRecord]) -> BTreeMap<Modality, ScoreResult> {
    Modality::ALL
        .iter()
        .filter_map(|modality| {
            let subset: Vec<ResponseRecord> = responses
                .iter()
                .filter(|r| r.modality == *modality)
                .cloned()
                .collect();
            if subset.is_empty() {
                None
            } else {
                Some((*modality, score_modality(&subset)))
            }
        })
        .collect()
}

/// Frequency tally that remembers the order in which keys were first seen.
#[derive(Debug, Default)]
pub(crate) struct Tally<'a> {
    counts: Vec<(&'a str, usize)>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    pub(crate) fn add(&mut self, key: &'a str) {
        match self.index.get(key) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(key, self.counts.len());
                self.counts.push((key, 1));
            }
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    pub(crate) fn max_count(&self) -> usize {
        self.counts.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }

    /// Keys ordered by descending count. Stable, so equal counts keep
    /// first-seen order.
    pub(crate) fn top(mut self, limit: usize) -> Vec<String> {
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(limit)
            .map(|(key, _)| key.to_string())
            .collect()
    }
}
