use serde::{Deserialize, Serialize};
use std::fmt;

pub mod catalog;
pub mod response;
pub mod score;
pub mod session;
pub mod stats;

pub use response::{NewResponse, ResponseRecord, ResponseValue, SubmitResponseRequest};
pub use score::{Confidence, ScoreResult};
pub use session::{CreateSessionRequest, Session, SessionResults, SessionScores, SessionUpdate};
pub use stats::TestStats;

/// Stimulus category a response belongs to.
///
/// The declaration order is the iteration order of every per-modality
/// mapping (`BTreeMap<Modality, _>`), which in turn fixes the order of
/// modality-specific recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Grapheme,
    Number,
    Sound,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Grapheme, Modality::Number, Modality::Sound];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Grapheme => "grapheme",
            Modality::Number => "number",
            Modality::Sound => "sound",
        }
    }

    /// Sound responses allow any number of colors, the others exactly one.
    pub fn allows_multiple_colors(&self) -> bool {
        matches!(self, Modality::Sound)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a session was created to administer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Grapheme,
    Number,
    Sound,
    /// Sequential administration of all three modalities
    #[default]
    All,
}

impl TestType {
    pub fn modalities(&self) -> &'static [Modality] {
        match self {
            TestType::Grapheme => &[Modality::Grapheme],
            TestType::Number => &[Modality::Number],
            TestType::Sound => &[Modality::Sound],
            TestType::All => &Modality::ALL,
        }
    }

    pub fn includes(&self, modality: Modality) -> bool {
        self.modalities().contains(&modality)
    }
}
