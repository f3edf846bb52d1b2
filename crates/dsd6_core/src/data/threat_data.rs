//! Threat card catalogue documents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DataError, DataFormat};

/// One entry of a card's activation list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivationEntry {
    /// Threat die value that activates the card.
    pub activation_value: u32,
}

/// Plain or internal threat card definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThreatCardData {
    /// Card title.
    pub name: String,

    /// Rules text printed on the card.
    pub effect_text: String,

    /// Threat die values that activate the card.
    #[serde(default)]
    pub activation_list: Vec<ActivationEntry>,

    /// Away mission data; carried through untouched.
    #[serde(default = "no_away_missions")]
    pub away_missions: ron::Value,
}

/// External threat card definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalThreatCardData {
    /// Card title.
    pub name: String,

    /// Rules text printed on the card.
    pub effect_text: String,

    /// Threat die values that activate the card.
    #[serde(default)]
    pub activation_list: Vec<ActivationEntry>,

    /// Away mission data; carried through untouched.
    #[serde(default = "no_away_missions")]
    pub away_missions: ron::Value,

    /// Health the threat starts with; 0 means it does not use health.
    pub starting_health: u32,
}

fn no_away_missions() -> ron::Value {
    ron::Value::Unit
}

/// Complete threat card catalogue.
///
/// # Example JSON
///
/// ```json
/// {
///   "Threats": [],
///   "ExternalThreats": [
///     { "name": "Scouting Ship", "effect_text": "Deal 1 damage.",
///       "activation_list": [{ "activation_value": 3 }],
///       "away_missions": [], "starting_health": 3 }
///   ],
///   "InternalThreats": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ThreatCatalogue {
    /// Plain threat cards.
    #[serde(rename = "Threats")]
    pub threats: Vec<ThreatCardData>,

    /// External threat cards.
    #[serde(rename = "ExternalThreats")]
    pub external_threats: Vec<ExternalThreatCardData>,

    /// Internal threat cards.
    #[serde(rename = "InternalThreats")]
    pub internal_threats: Vec<ThreatCardData>,
}

impl ThreatCatalogue {
    /// Parse a catalogue from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, DataError> {
        DataFormat::Json.parse(text)
    }

    /// Parse a catalogue from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, DataError> {
        DataFormat::Ron.parse(text)
    }

    /// Read a catalogue file, picking the format from its extension.
    pub fn load_file(path: &Path) -> Result<Self, DataError> {
        DataFormat::load_file(path)
    }

    /// Total number of cards across all three categories.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.threats.len() + self.external_threats.len() + self.internal_threats.len()
    }
}
