//! Saved games.
//!
//! A save stores the mutable part of a play-through: the deck's working
//! lists, external threat damage, the ship's pools and tracked threats, and
//! the current screen. Cards are stored by catalogue index because card ids
//! are handed out afresh every session; a save can only be applied to a deck
//! built from the same catalogue.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::rng::RandomSource;
use crate::screens::Screen;
use crate::ship::{Ship, ShipPools};
use crate::threat_deck::{DeckError, ThreatDeck};
use crate::threats::{Threat, ThreatId};

/// Save file format version for compatibility.
pub const SAVE_GAME_VERSION: u32 = 1;

/// Snapshot of a play-through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Save format version.
    pub version: u32,
    /// Whether the deck shuffles reproducibly.
    pub reproducible: bool,
    /// Seed of the deck's random source.
    pub seed: Option<u64>,
    /// Available cards, top first, as catalogue indices.
    pub available: Vec<usize>,
    /// Discarded cards as catalogue indices.
    pub discarded: Vec<usize>,
    /// Destroyed cards as catalogue indices.
    pub destroyed: Vec<usize>,
    /// Current health of every external threat, by catalogue index.
    pub external_health: Vec<(usize, u32)>,
    /// Ship pools.
    pub ship: ShipPools,
    /// External threats tracked by the ship, as catalogue indices.
    pub external_threats: Vec<usize>,
    /// Internal threats tracked by the ship, as catalogue indices.
    pub internal_threats: Vec<usize>,
    /// Name of the screen the game was saved from.
    pub screen: String,
}

impl SaveGame {
    /// Capture the current deck, ship and screen.
    ///
    /// # Errors
    /// Returns [`GameError::Deck`] if the ship tracks a card that is not part
    /// of the deck.
    pub fn capture(deck: &ThreatDeck, ship: &Ship, screen: Screen) -> Result<Self> {
        let external_health = deck
            .all_cards()
            .iter()
            .enumerate()
            .filter_map(|(index, card)| card.health().map(|h| (index, h.current())))
            .collect();

        Ok(Self {
            version: SAVE_GAME_VERSION,
            reproducible: deck.rng().is_reproducible(),
            seed: deck.rng().seed(),
            available: to_indices(deck, deck.available_cards())?,
            discarded: to_indices(deck, deck.discarded_cards())?,
            destroyed: to_indices(deck, deck.destroyed_cards())?,
            external_health,
            ship: ship.pools(),
            external_threats: to_indices(deck, ship.external_threats())?,
            internal_threats: to_indices(deck, ship.internal_threats())?,
            screen: screen.name().to_string(),
        })
    }

    /// Screen the game was saved from, if the name is still known.
    #[must_use]
    pub fn screen(&self) -> Option<Screen> {
        Screen::from_name(&self.screen)
    }

    /// Restore the snapshot into a deck built from the same catalogue.
    ///
    /// Nothing is modified unless the whole snapshot fits the deck. A
    /// reproducible deck restarts its shuffle stream from the saved seed.
    ///
    /// # Errors
    /// Returns [`GameError::CatalogueMismatch`] for an index outside the
    /// deck or a health entry on a card without health, and
    /// [`GameError::Deck`] if a card appears in two working lists.
    pub fn apply(&self, deck: &mut ThreatDeck, ship: &mut Ship) -> Result<()> {
        let available = to_ids(deck, &self.available)?;
        let discarded = to_ids(deck, &self.discarded)?;
        let destroyed = to_ids(deck, &self.destroyed)?;
        let external = to_ids(deck, &self.external_threats)?;
        let internal = to_ids(deck, &self.internal_threats)?;

        let mut health = Vec::with_capacity(self.external_health.len());
        for &(index, current) in &self.external_health {
            let id = to_id(deck, index)?;
            if deck.card(id).and_then(Threat::health).is_none() {
                return Err(GameError::CatalogueMismatch {
                    index,
                    cards: deck.len(),
                });
            }
            health.push((id, current));
        }

        deck.restore_lists(available, discarded, destroyed)?;
        for (id, current) in health {
            if let Some(pool) = deck.card_mut(id).and_then(Threat::health_mut) {
                pool.set(current);
            }
        }
        deck.replace_rng(RandomSource::new(self.reproducible, self.seed));
        ship.restore_pools(&self.ship);
        ship.restore_threats(external, internal);

        tracing::info!(
            available = self.available.len(),
            discarded = self.discarded.len(),
            destroyed = self.destroyed.len(),
            screen = %self.screen,
            "Save game applied"
        );
        Ok(())
    }

    /// Write the snapshot to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| GameError::SaveGame(format!("Failed to serialize save game: {e}")))?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| GameError::SaveGame(format!("Failed to write save file: {e}")))?;
        Ok(())
    }

    /// Read a snapshot from a file.
    ///
    /// # Errors
    /// Returns an error if reading or deserialization fails, or if the file
    /// was written by another format version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| GameError::SaveGame(format!("Failed to read save file: {e}")))?;
        let save: Self = bincode::deserialize(&bytes)
            .map_err(|e| GameError::SaveGame(format!("Failed to deserialize save game: {e}")))?;

        if save.version != SAVE_GAME_VERSION {
            return Err(GameError::SaveGameVersion {
                expected: SAVE_GAME_VERSION,
                found: save.version,
            });
        }
        Ok(save)
    }
}

fn to_indices(deck: &ThreatDeck, ids: &[ThreatId]) -> Result<Vec<usize>> {
    ids.iter()
        .map(|&id| {
            deck.catalogue_index(id)
                .ok_or(GameError::Deck(DeckError::UnknownCard(id)))
        })
        .collect()
}

fn to_id(deck: &ThreatDeck, index: usize) -> Result<ThreatId> {
    deck.id_at(index).ok_or(GameError::CatalogueMismatch {
        index,
        cards: deck.len(),
    })
}

fn to_ids(deck: &ThreatDeck, indices: &[usize]) -> Result<Vec<ThreatId>> {
    indices.iter().map(|&index| to_id(deck, index)).collect()
}
