//! Test fixtures and helpers.
//!
//! Sample data documents, pre-built decks and ships, and FSM hooks that
//! record every call for consistent testing.

use dsd6_core::data::{ShipData, ThreatCatalogue};
use dsd6_core::fsm::{State, StateHooks};
use dsd6_core::identity::IdAllocator;
use dsd6_core::rng::RandomSource;
use dsd6_core::ship::Ship;
use dsd6_core::threat_deck::ThreatDeck;

/// Catalogue with two plain, three external and two internal threats.
pub const SAMPLE_CATALOGUE_JSON: &str = r#"{
    "Threats": [
        { "name": "Distracted", "effect_text": "Lock one crew die until the end of next turn.",
          "activation_list": [], "away_missions": [] },
        { "name": "Panel Explosion", "effect_text": "Send one crew die to the infirmary.",
          "activation_list": [], "away_missions": [] }
    ],
    "ExternalThreats": [
        { "name": "Scouting Ship", "effect_text": "Deal 1 damage.", "starting_health": 3,
          "activation_list": [{ "activation_value": 3 }, { "activation_value": 4 }],
          "away_missions": [] },
        { "name": "Raiders", "effect_text": "Deal 2 damage.", "starting_health": 4,
          "activation_list": [{ "activation_value": 5 }], "away_missions": [] },
        { "name": "Solar Winds", "effect_text": "Deal 5 damage, then discard.", "starting_health": 0,
          "activation_list": [{ "activation_value": 6 }], "away_missions": [] }
    ],
    "InternalThreats": [
        { "name": "Boarding Ship", "effect_text": "Lose one crew die.",
          "activation_list": [{ "activation_value": 2 }],
          "away_missions": [{ "crew": "Tactical", "reward": "Hull" }] },
        { "name": "Friendly Fire", "effect_text": "Deal 1 damage to the hull.",
          "activation_list": [{ "activation_value": 1 }], "away_missions": [] }
    ]
}"#;

/// The same catalogue as [`SAMPLE_CATALOGUE_JSON`], written in RON.
pub const SAMPLE_CATALOGUE_RON: &str = r#"(
    Threats: [
        (name: "Distracted", effect_text: "Lock one crew die until the end of next turn.",
         activation_list: [], away_missions: []),
        (name: "Panel Explosion", effect_text: "Send one crew die to the infirmary.",
         activation_list: [], away_missions: []),
    ],
    ExternalThreats: [
        (name: "Scouting Ship", effect_text: "Deal 1 damage.", starting_health: 3,
         activation_list: [(activation_value: 3), (activation_value: 4)], away_missions: []),
        (name: "Raiders", effect_text: "Deal 2 damage.", starting_health: 4,
         activation_list: [(activation_value: 5)], away_missions: []),
        (name: "Solar Winds", effect_text: "Deal 5 damage, then discard.", starting_health: 0,
         activation_list: [(activation_value: 6)], away_missions: []),
    ],
    InternalThreats: [
        (name: "Boarding Ship", effect_text: "Lose one crew die.",
         activation_list: [(activation_value: 2)],
         away_missions: [(crew: "Tactical", reward: "Hull")]),
        (name: "Friendly Fire", effect_text: "Deal 1 damage to the hull.",
         activation_list: [(activation_value: 1)], away_missions: []),
    ],
)"#;

/// Number of cards in the sample catalogue.
pub const SAMPLE_CARD_COUNT: usize = 7;

/// Ship definition in RON.
pub const SAMPLE_SHIP_RON: &str = r#"(
    name: "Halcyon",
    complement: 6,
    shield_points: 4,
    hull_points: 8,
)"#;

/// Ship definition in JSON.
pub const SAMPLE_SHIP_JSON: &str =
    r#"{ "name": "Halcyon", "complement": 6, "shield_points": 4, "hull_points": 8 }"#;

/// Parse the sample catalogue.
///
/// # Panics
///
/// Panics if the embedded document no longer parses.
#[must_use]
pub fn sample_catalogue() -> ThreatCatalogue {
    ThreatCatalogue::from_json_str(SAMPLE_CATALOGUE_JSON).expect("sample catalogue parses")
}

/// Parse the sample ship.
///
/// # Panics
///
/// Panics if the embedded document no longer parses.
#[must_use]
pub fn sample_ship_data() -> ShipData {
    ShipData::from_ron_str(SAMPLE_SHIP_RON).expect("sample ship parses")
}

/// Sample deck with a reproducible random source, reset and ready to shuffle.
#[must_use]
pub fn sample_deck(ids: &mut IdAllocator, seed: u64) -> ThreatDeck {
    let mut deck =
        ThreatDeck::from_catalogue(&sample_catalogue(), ids, RandomSource::reproducible(Some(seed)));
    deck.reset_deck();
    deck
}

/// Sample ship at full strength.
///
/// # Panics
///
/// Panics if the sample ship definition is invalid.
#[must_use]
pub fn sample_ship(ids: &mut IdAllocator) -> Ship {
    Ship::from_data(&sample_ship_data(), ids).expect("sample ship is valid")
}

/// One call made by the state machine on [`RecordingHooks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// `enter` was called.
    Enter {
        /// State entered.
        state: String,
        /// State left, if any.
        previous: Option<String>,
    },
    /// `leave` was called.
    Leave {
        /// State left.
        state: String,
        /// State about to be entered.
        next: String,
    },
}

impl HookEvent {
    /// Enter event, for building expectations.
    #[must_use]
    pub fn enter(state: &str, previous: Option<&str>) -> Self {
        Self::Enter {
            state: state.to_string(),
            previous: previous.map(str::to_string),
        }
    }

    /// Leave event, for building expectations.
    #[must_use]
    pub fn leave(state: &str, next: &str) -> Self {
        Self::Leave {
            state: state.to_string(),
            next: next.to_string(),
        }
    }
}

/// Context type for machines driven by [`RecordingHooks`].
pub type HookLog = Vec<HookEvent>;

/// Hooks that append every call to the [`HookLog`] context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingHooks;

impl StateHooks<HookLog> for RecordingHooks {
    fn enter(&mut self, ctx: &mut HookLog, state: &State, previous: Option<&State>) {
        ctx.push(HookEvent::enter(state.name(), previous.map(State::name)));
    }

    fn leave(&mut self, ctx: &mut HookLog, state: &State, next: &State) {
        ctx.push(HookEvent::leave(state.name(), next.name()));
    }
}
