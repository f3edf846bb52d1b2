//! # DSD6 Core
//!
//! Rule-state engine for the Deep Space D6 solitaire game.
//!
//! This crate contains **only** game state and rules:
//! - No rendering
//! - No input handling
//! - No event loop
//!
//! Presentation code drives the engine by firing transitions on the
//! [`fsm::StateMachine`] and calling the deck, dice and ship operations from
//! its state hooks.
//!
//! ## Crate Structure
//!
//! - [`identity`] - Monotonic id allocation
//! - [`rng`] - Reproducible and entropy-seeded random sources
//! - [`die`] - Faced dice
//! - [`threats`] - Threat cards
//! - [`threat_deck`] - The threat deck and its working lists
//! - [`ship`] - The player's ship
//! - [`fsm`] - States, guarded transitions and the firing algorithm
//! - [`screens`] - The game's concrete screen graph
//! - [`save_game`] - Saved game snapshots
//! - [`data`] - Catalogue and ship definitions loaded from RON or JSON

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod data;
pub mod die;
pub mod error;
pub mod fsm;
pub mod identity;
pub mod rng;
pub mod save_game;
pub mod screens;
pub mod ship;
pub mod threat_deck;
pub mod threats;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{DataError, DataFormat, DataKind, ShipData, ThreatCatalogue};
    pub use crate::die::Die;
    pub use crate::error::{GameError, Result};
    pub use crate::fsm::{
        FsmError, Guard, NoHooks, State, StateHooks, StateId, StateMachine, Transition,
    };
    pub use crate::identity::{EntityId, IdAllocator};
    pub use crate::rng::RandomSource;
    pub use crate::save_game::SaveGame;
    pub use crate::screens::{Screen, ScreenGraph};
    pub use crate::ship::Ship;
    pub use crate::threat_deck::{CardLocation, DeckError, ThreatDeck};
    pub use crate::threats::{Threat, ThreatId, ThreatKind};
}
