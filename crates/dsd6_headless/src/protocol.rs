//! JSON protocol for headless session control.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** Commands from the controller
//! **Output (stdout):** One response per command
//!
//! # Protocol Flow
//!
//! 1. Runner starts, enters the splash screen and outputs
//!    `{"type":"ready","version":"1.0","screen":"splash_screen"}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command with exactly one response
//! 4. `quit` is acknowledged and ends the session
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","screen":"splash_screen"}
//! -> {"cmd":"fire"}
//! <- {"type":"screen","screen":"main_menu_screen","previous":"splash_screen"}
//! -> {"cmd":"fire","target":"new_game_screen"}
//! <- {"type":"screen","screen":"new_game_screen","previous":"main_menu_screen"}
//! -> {"cmd":"fire","target":"game_play_screen"}
//! <- {"type":"screen","screen":"game_play_screen","previous":"new_game_screen"}
//! -> {"cmd":"draw"}
//! <- {"type":"card","card":{"id":1000000003,"name":"Raiders",...}}
//! -> {"cmd":"roll","die":"threat"}
//! <- {"type":"roll","die":"threat","value":4,"face":"Four"}
//! -> {"cmd":"quit"}
//! <- {"type":"ack","cmd":"quit"}
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Commands (Controller -> Runner)
// ============================================================================

/// Commands that can be sent to the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Report the current screen, ship and deck.
    Query,

    /// Fire a transition out of the current screen. Without a target the
    /// screen's first transition is used.
    Fire {
        #[serde(default)]
        target: Option<String>,
    },

    /// Draw the top card of the deck.
    Draw,

    /// Discard a card by id.
    Discard { card: u64 },

    /// Destroy a card by id.
    Destroy { card: u64 },

    /// Make every card available again.
    ResetDeck,

    /// Make every non-destroyed card available again.
    ReformDeck,

    /// Shuffle the available cards.
    Shuffle {
        #[serde(default = "default_reproducible")]
        reproducible: bool,
    },

    /// Roll one of the dice.
    Roll { die: DieKind },

    /// Move crew into the infirmary.
    CrewToInfirmary { amount: i32 },

    /// Move crew out of the infirmary.
    CrewFromInfirmary { amount: i32 },

    /// Return every crew member to duty.
    ClearInfirmary,

    /// Write a saved game.
    Save { path: String },

    /// Restore a saved game.
    Load { path: String },

    /// End the session.
    Quit,
}

fn default_reproducible() -> bool {
    true
}

/// Which die to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DieKind {
    /// The six-sided threat die.
    Threat,
    /// A crew die.
    Crew,
}

// ============================================================================
// Output Responses (Runner -> Controller)
// ============================================================================

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready { version: String, screen: String },

    /// Full session state.
    State {
        screen: Option<String>,
        ship: ShipState,
        deck: DeckState,
    },

    /// A transition fired.
    Screen { screen: String, previous: String },

    /// Result of a draw; `None` when the deck is empty.
    Card { card: Option<CardState> },

    /// Result of a roll.
    Roll {
        die: DieKind,
        value: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        face: Option<String>,
    },

    /// Acknowledgment of a command.
    Ack { cmd: String },

    /// Error processing a command.
    Error {
        message: String,
        cmd: Option<String>,
    },
}

// ============================================================================
// State Types
// ============================================================================

/// Ship pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipState {
    pub name: String,
    pub complement: u32,
    pub available_crew: u32,
    pub infirmary: u32,
    pub shields: u32,
    pub max_shields: u32,
    pub hull: u32,
    pub max_hull: u32,
    pub threats_detected: u32,
    pub destroyed: bool,
}

/// Deck working lists, by card id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    pub total: usize,
    pub available: Vec<u64>,
    pub discarded: Vec<u64>,
    pub destroyed: Vec<u64>,
    pub reproducible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// One card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    pub id: u64,
    pub name: String,
    pub kind: String,
    pub effect_text: String,
    pub activation: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthState>,
}

/// Health of an external threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthState {
    pub current: u32,
    pub max: u32,
}

// ============================================================================
// Helpers
// ============================================================================

/// Protocol version reported in the ready message.
pub const PROTOCOL_VERSION: &str = "1.0";

impl Response {
    /// Create a ready response.
    pub fn ready(screen: &str) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            screen: screen.to_string(),
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get command name for acknowledgment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Fire { .. } => "fire",
            Self::Draw => "draw",
            Self::Discard { .. } => "discard",
            Self::Destroy { .. } => "destroy",
            Self::ResetDeck => "reset_deck",
            Self::ReformDeck => "reform_deck",
            Self::Shuffle { .. } => "shuffle",
            Self::Roll { .. } => "roll",
            Self::CrewToInfirmary { .. } => "crew_to_infirmary",
            Self::CrewFromInfirmary { .. } => "crew_from_infirmary",
            Self::ClearInfirmary => "clear_infirmary",
            Self::Save { .. } => "save",
            Self::Load { .. } => "load",
            Self::Quit => "quit",
        }
    }
}
