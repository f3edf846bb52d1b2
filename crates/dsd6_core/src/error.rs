//! Error types for the rule-state engine.

use thiserror::Error;

use crate::data::DataError;
use crate::fsm::FsmError;
use crate::threat_deck::DeckError;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the engine.
#[derive(Debug, Error)]
pub enum GameError {
    /// Navigation through the state graph failed.
    #[error(transparent)]
    Fsm(#[from] FsmError),

    /// A deck operation referred to a card outside the deck.
    #[error(transparent)]
    Deck(#[from] DeckError),

    /// A data file could not be loaded.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A saved game could not be written or read.
    #[error("Save game error: {0}")]
    SaveGame(String),

    /// A saved game was written by an incompatible version.
    #[error("Save game version mismatch: expected {expected}, got {found}")]
    SaveGameVersion {
        /// Version this build writes.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },

    /// A saved game does not fit the loaded catalogue.
    #[error("Save game refers to catalogue index {index}, but the deck holds {cards} cards")]
    CatalogueMismatch {
        /// Offending index.
        index: usize,
        /// Cards in the deck.
        cards: usize,
    },
}
