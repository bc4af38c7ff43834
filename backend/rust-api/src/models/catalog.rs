//! Static stimulus catalog served to clients and used to validate submissions.

use serde::Serialize;

use super::Modality;

static GRAPHEME_ITEMS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

static NUMBER_ITEMS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

static SOUND_ITEMS: [SoundItem; 12] = [
    SoundItem::new("piano-c4", "Piano Note C4"),
    SoundItem::new("violin-a", "Violin A"),
    SoundItem::new("thunder", "Thunder"),
    SoundItem::new("rain", "Rain"),
    SoundItem::new("bell", "Bell"),
    SoundItem::new("guitar-chord", "Guitar Chord"),
    SoundItem::new("flute", "Flute"),
    SoundItem::new("drum-beat", "Drum Beat"),
    SoundItem::new("ocean-waves", "Ocean Waves"),
    SoundItem::new("bird-song", "Bird Song"),
    SoundItem::new("car-horn", "Car Horn"),
    SoundItem::new("wind", "Wind"),
];

// Palettes share a prefix; shorter palettes are slices of the grapheme one.
static PALETTE: [&str; 24] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9", "#F8C471", "#82E0AA", "#F1948A", "#C39BD3", "#7FB3D3", "#A8A8A8",
    "#FFB3BA", "#BAFFC9", "#BAE1FF", "#FFFFBA", "#FFD1DC", "#E0BBE4", "#957DAD", "#FEC89A",
];

const GRAPHEME_COLORS: usize = 24;
const NUMBER_COLORS: usize = 16;
const SOUND_COLORS: usize = 12;

/// A sound stimulus: stable identifier plus display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundItem {
    pub id: &'static str,
    pub name: &'static str,
}

impl SoundItem {
    const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StimulusSet<I: 'static> {
    pub items: &'static [I],
    pub colors: &'static [&'static str],
}

/// Full catalog as exposed by `GET /api/v1/test-config`.
#[derive(Debug, Clone, Serialize)]
pub struct TestConfig {
    pub grapheme: StimulusSet<&'static str>,
    pub number: StimulusSet<&'static str>,
    pub sound: StimulusSet<SoundItem>,
}

pub fn test_config() -> TestConfig {
    TestConfig {
        grapheme: StimulusSet {
            items: &GRAPHEME_ITEMS,
            colors: palette(Modality::Grapheme),
        },
        number: StimulusSet {
            items: &NUMBER_ITEMS,
            colors: palette(Modality::Number),
        },
        sound: StimulusSet {
            items: &SOUND_ITEMS,
            colors: palette(Modality::Sound),
        },
    }
}

/// Stimulus identifiers for a modality, in presentation order.
pub fn stimuli(modality: Modality) -> Vec<&'static str> {
    match modality {
        Modality::Grapheme => GRAPHEME_ITEMS.to_vec(),
        Modality::Number => NUMBER_ITEMS.to_vec(),
        Modality::Sound => SOUND_ITEMS.iter().map(|item| item.id).collect(),
    }
}

pub fn palette(modality: Modality) -> &'static [&'static str] {
    let len = match modality {
        Modality::Grapheme => GRAPHEME_COLORS,
        Modality::Number => NUMBER_COLORS,
        Modality::Sound => SOUND_COLORS,
    };
    &PALETTE[..len]
}

pub fn contains_stimulus(modality: Modality, stimulus: &str) -> bool {
    match modality {
        Modality::Grapheme => GRAPHEME_ITEMS.contains(&stimulus),
        Modality::Number => NUMBER_ITEMS.contains(&stimulus),
        Modality::Sound => SOUND_ITEMS.iter().any(|item| item.id == stimulus),
    }
}
