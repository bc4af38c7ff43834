use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{Modality, ScoreResult, TestType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub test_type: TestType,
    /// Written once, on completion
    pub scores: Option<SessionScores>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(test_type: TestType) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            test_type,
            scores: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Merges the fields present in `update`, leaving the rest untouched.
    pub fn apply(&mut self, update: SessionUpdate) {
        if let Some(scores) = update.scores {
            self.scores = Some(scores);
        }
        if let Some(completed_at) = update.completed_at {
            self.completed_at = Some(completed_at);
        }
    }
}

/// Per-modality scores plus the overall score. A modality key is present
/// only when the session had responses for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grapheme: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<u8>,
    pub overall: u8,
}

impl SessionScores {
    pub fn from_results(per_modality: &BTreeMap<Modality, ScoreResult>, overall: &ScoreResult) -> Self {
        let score_of = |modality| per_modality.get(&modality).map(|result| result.score);
        Self {
            grapheme: score_of(Modality::Grapheme),
            number: score_of(Modality::Number),
            sound: score_of(Modality::Sound),
            overall: overall.score,
        }
    }

    pub fn modality(&self, modality: Modality) -> Option<u8> {
        match modality {
            Modality::Grapheme => self.grapheme,
            Modality::Number => self.number,
            Modality::Sound => self.sound,
        }
    }

    /// `(key, score)` pairs for every present score, `overall` last.
    pub fn entries(&self) -> Vec<(&'static str, u8)> {
        let mut entries: Vec<(&'static str, u8)> = Modality::ALL
            .iter()
            .filter_map(|m| self.modality(*m).map(|score| (m.as_str(), score)))
            .collect();
        entries.push(("overall", self.overall));
        entries
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub scores: Option<SessionScores>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub test_type: TestType,
}

/// Full breakdown of a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResults {
    pub session_id: String,
    pub test_type: TestType,
    pub completed_at: DateTime<Utc>,
    pub modalities: BTreeMap<Modality, ScoreResult>,
    pub overall: ScoreResult,
    pub recommendations: Vec<String>,
}
