use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use super::{catalog, Modality};

/// Color selection for one stimulus presentation.
///
/// On the wire this is either a JSON string or a JSON array of strings.
/// [`ResponseValue::resolve`] fixes the variant against the modality before a
/// value is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseShapeError {
    #[error("{0} responses take exactly one color")]
    ExpectedSingle(Modality),

    #[error("color values must be non-empty strings")]
    EmptyColor,

    #[error("unknown {modality} stimulus '{stimulus}'")]
    UnknownStimulus { modality: Modality, stimulus: String },

    #[error("response time {actual_ms}ms exceeds limit of {limit_ms}ms")]
    ResponseTimeTooLong { actual_ms: u64, limit_ms: u64 },
}

impl ResponseValue {
    /// Checks the value against the modality and normalizes it.
    ///
    /// Grapheme and number responses must be a single color. Sound responses
    /// always become `Multiple`, with duplicates collapsed in first-seen order.
    pub fn resolve(self, modality: Modality) -> Result<Self, ResponseShapeError> {
        if self.colors().iter().any(|color| color.trim().is_empty()) {
            return Err(ResponseShapeError::EmptyColor);
        }

        match (modality.allows_multiple_colors(), self) {
            (false, ResponseValue::Single(color)) => Ok(ResponseValue::Single(color)),
            (false, ResponseValue::Multiple(_)) => Err(ResponseShapeError::ExpectedSingle(modality)),
            (true, ResponseValue::Single(color)) => Ok(ResponseValue::Multiple(vec![color])),
            (true, ResponseValue::Multiple(colors)) => {
                let mut unique: Vec<String> = Vec::with_capacity(colors.len());
                for color in colors {
                    if !unique.contains(&color) {
                        unique.push(color);
                    }
                }
                Ok(ResponseValue::Multiple(unique))
            }
        }
    }

    pub fn colors(&self) -> &[String] {
        match self {
            ResponseValue::Single(color) => std::slice::from_ref(color),
            ResponseValue::Multiple(colors) => colors,
        }
    }
}

/// One stored observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    pub session_id: String,
    pub modality: Modality,
    pub stimulus: String,
    pub response: ResponseValue,
    /// Milliseconds from stimulus presentation to submission
    pub response_time: u64,
    /// Retest counter, starts at 1
    pub attempt: u32,
    pub timestamp: DateTime<Utc>,
}

/// A validated response ready for the store, which assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewResponse {
    pub session_id: String,
    pub modality: Modality,
    pub stimulus: String,
    pub response: ResponseValue,
    pub response_time: u64,
    pub attempt: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub modality: Modality,

    #[validate(length(min = 1, max = 64))]
    pub stimulus: String,

    pub response: ResponseValue,

    #[serde(default)]
    pub response_time: u64,

    #[validate(range(min = 1, max = 100))]
    pub attempt: Option<u32>,
}

impl SubmitResponseRequest {
    /// Boundary check: stimulus must belong to the modality, response shape
    /// must match it and the response time must be plausible.
    pub fn into_new_response(
        self,
        session_id: &str,
        max_response_time_ms: u64,
    ) -> Result<NewResponse, ResponseShapeError> {
        if !catalog::contains_stimulus(self.modality, &self.stimulus) {
            return Err(ResponseShapeError::UnknownStimulus {
                modality: self.modality,
                stimulus: self.stimulus,
            });
        }

        if self.response_time > max_response_time_ms {
            return Err(ResponseShapeError::ResponseTimeTooLong {
                actual_ms: self.response_time,
                limit_ms: max_response_time_ms,
            });
        }

        let response = self.response.resolve(self.modality)?;

        Ok(NewResponse {
            session_id: session_id.to_string(),
            modality: self.modality,
            stimulus: self.stimulus,
            response,
            response_time: self.response_time,
            attempt: self.attempt.unwrap_or(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(modality: Modality, stimulus: &str, response: ResponseValue) -> SubmitResponseRequest {
        SubmitResponseRequest {
            modality,
            stimulus: stimulus.to_string(),
            response,
            response_time: 850,
            attempt: None,
        }
    }

    #[test]
    fn test_response_value_accepts_string_or_array() {
        let single: ResponseValue = serde_json::from_str("\"#FF6B6B\"").unwrap();
        assert_eq!(single, ResponseValue::Single("#FF6B6B".into()));

        let multiple: ResponseValue = serde_json::from_str("[\"#FF6B6B\", \"#4ECDC4\"]").unwrap();
        assert_eq!(multiple.colors().len(), 2);

        assert!(serde_json::from_str::<ResponseValue>("42").is_err());
    }

    #[test]
    fn test_resolve_rejects_array_for_grapheme() {
        let value = ResponseValue::Multiple(vec!["#FF6B6B".into()]);
        assert_eq!(
            value.resolve(Modality::Grapheme),
            Err(ResponseShapeError::ExpectedSingle(Modality::Grapheme))
        );
    }

    #[test]
    fn test_resolve_collapses_duplicate_sound_colors() {
        let value = ResponseValue::Multiple(vec![
            "#45B7D1".into(),
            "#FF6B6B".into(),
            "#45B7D1".into(),
        ]);
        assert_eq!(
            value.resolve(Modality::Sound).unwrap(),
            ResponseValue::Multiple(vec!["#45B7D1".into(), "#FF6B6B".into()])
        );
    }

    #[test]
    fn test_resolve_allows_empty_sound_selection() {
        let value = ResponseValue::Multiple(vec![]);
        assert_eq!(
            value.resolve(Modality::Sound).unwrap(),
            ResponseValue::Multiple(vec![])
        );
    }

    #[test]
    fn test_resolve_rejects_blank_color() {
        let value = ResponseValue::Single("  ".into());
        assert_eq!(
            value.resolve(Modality::Number),
            Err(ResponseShapeError::EmptyColor)
        );
    }

    #[test]
    fn test_into_new_response_defaults_attempt() {
        let new = request(Modality::Number, "7", ResponseValue::Single("#96CEB4".into()))
            .into_new_response("session-1", 600_000)
            .unwrap();
        assert_eq!(new.attempt, 1);
        assert_eq!(new.session_id, "session-1");
    }

    #[test]
    fn test_into_new_response_rejects_foreign_stimulus() {
        let err = request(Modality::Number, "A", ResponseValue::Single("#96CEB4".into()))
            .into_new_response("session-1", 600_000)
            .unwrap_err();
        assert!(matches!(err, ResponseShapeError::UnknownStimulus { .. }));
    }

    #[test]
    fn test_into_new_response_rejects_slow_response() {
        let mut req = request(Modality::Grapheme, "A", ResponseValue::Single("#96CEB4".into()));
        req.response_time = 700_000;
        let err = req.into_new_response("session-1", 600_000).unwrap_err();
        assert_eq!(
            err,
            ResponseShapeError::ResponseTimeTooLong {
                actual_ms: 700_000,
                limit_ms: 600_000
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_stimulus() {
        let req = request(Modality::Grapheme, "", ResponseValue::Single("#96CEB4".into()));
        assert!(req.validate().is_err());
    }
}
