//! The threat deck.
//!
//! The deck owns every card in the catalogue and tracks three working lists
//! of card ids: available (top of the deck at index 0), discarded and
//! destroyed. At rest every card sits in at most one of the three lists.
//!
//! # Example
//!
//! ```
//! use dsd6_core::data::ThreatCatalogue;
//! use dsd6_core::identity::IdAllocator;
//! use dsd6_core::rng::RandomSource;
//! use dsd6_core::threat_deck::ThreatDeck;
//!
//! let catalogue = ThreatCatalogue::from_json_str(
//!     r#"{ "Threats": [], "ExternalThreats": [], "InternalThreats": [
//!         { "name": "Boarders", "effect_text": "Lose a crew die.", "activation_list": [] }
//!     ] }"#,
//! ).unwrap();
//!
//! let mut ids = IdAllocator::new();
//! let mut deck = ThreatDeck::from_catalogue(&catalogue, &mut ids, RandomSource::reproducible(Some(1)));
//! deck.reset_deck();
//! deck.shuffle_deck(true);
//! assert!(deck.draw_card().is_some());
//! assert!(deck.draw_card().is_none());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::ThreatCatalogue;
use crate::identity::IdAllocator;
use crate::rng::RandomSource;
use crate::threats::{Threat, ThreatId};

/// Errors raised by deck operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// The id does not belong to any card in this deck.
    #[error("Card {0} is not part of this deck")]
    UnknownCard(ThreatId),

    /// A card appears in more than one working list.
    #[error("Card {0} appears in more than one working list")]
    OverlappingLists(ThreatId),
}

/// Working list a card currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardLocation {
    /// Still to be drawn.
    Available,
    /// Drawn and discarded.
    Discarded,
    /// Removed from play until the deck is reset.
    Destroyed,
}

/// Catalogue of threat cards plus the available/discarded/destroyed lists.
#[derive(Debug, Clone)]
pub struct ThreatDeck {
    all_cards: Vec<Threat>,
    index: HashMap<ThreatId, usize>,
    available: Vec<ThreatId>,
    discarded: Vec<ThreatId>,
    destroyed: Vec<ThreatId>,
    rng: RandomSource,
}

impl ThreatDeck {
    /// Build the deck from a catalogue.
    ///
    /// Cards are created in catalogue order: plain threats, then external
    /// threats, then internal threats. Each takes a fresh id from `ids`. The
    /// working lists start empty; call [`reset_deck`](Self::reset_deck) before
    /// drawing.
    #[must_use]
    pub fn from_catalogue(
        catalogue: &ThreatCatalogue,
        ids: &mut IdAllocator,
        rng: RandomSource,
    ) -> Self {
        let mut all_cards = Vec::with_capacity(catalogue.card_count());
        for data in &catalogue.threats {
            all_cards.push(Threat::plain_from_data(ids, data));
        }
        for data in &catalogue.external_threats {
            all_cards.push(Threat::external_from_data(ids, data));
        }
        for data in &catalogue.internal_threats {
            all_cards.push(Threat::internal_from_data(ids, data));
        }

        tracing::debug!(cards = all_cards.len(), rng = %rng, "Threat deck loaded");
        Self::from_cards(all_cards, rng)
    }

    /// Build a deck from cards that already carry ids.
    #[must_use]
    pub fn from_cards(all_cards: Vec<Threat>, rng: RandomSource) -> Self {
        let index = all_cards
            .iter()
            .enumerate()
            .map(|(i, card)| (card.uid(), i))
            .collect();
        Self {
            all_cards,
            index,
            available: Vec::new(),
            discarded: Vec::new(),
            destroyed: Vec::new(),
            rng,
        }
    }

    /// Every card, in catalogue order.
    #[must_use]
    pub fn all_cards(&self) -> &[Threat] {
        &self.all_cards
    }

    /// Cards still to be drawn; index 0 is the top of the deck.
    #[must_use]
    pub fn available_cards(&self) -> &[ThreatId] {
        &self.available
    }

    /// Discarded cards, in discard order.
    #[must_use]
    pub fn discarded_cards(&self) -> &[ThreatId] {
        &self.discarded
    }

    /// Destroyed cards, in destruction order.
    #[must_use]
    pub fn destroyed_cards(&self) -> &[ThreatId] {
        &self.destroyed
    }

    /// Number of cards in the catalogue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all_cards.len()
    }

    /// Whether the catalogue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all_cards.is_empty()
    }

    /// Random source used for shuffling.
    #[must_use]
    pub const fn rng(&self) -> &RandomSource {
        &self.rng
    }

    /// Swap in a new random source, returning the old one.
    pub fn replace_rng(&mut self, rng: RandomSource) -> RandomSource {
        std::mem::replace(&mut self.rng, rng)
    }

    /// Look up a card by id.
    #[must_use]
    pub fn card(&self, id: ThreatId) -> Option<&Threat> {
        self.index.get(&id).map(|&i| &self.all_cards[i])
    }

    /// Mutable access to a card, e.g. to damage an external threat.
    pub fn card_mut(&mut self, id: ThreatId) -> Option<&mut Threat> {
        self.index.get(&id).map(|&i| &mut self.all_cards[i])
    }

    /// Position of a card in the catalogue.
    #[must_use]
    pub fn catalogue_index(&self, id: ThreatId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Id of the card at a catalogue position.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ThreatId> {
        self.all_cards.get(index).map(Threat::uid)
    }

    /// Which working list a card is in, if any.
    #[must_use]
    pub fn location_of(&self, id: ThreatId) -> Option<CardLocation> {
        if self.available.contains(&id) {
            Some(CardLocation::Available)
        } else if self.discarded.contains(&id) {
            Some(CardLocation::Discarded)
        } else if self.destroyed.contains(&id) {
            Some(CardLocation::Destroyed)
        } else {
            None
        }
    }

    /// Start a fresh play-through: every card, destroyed ones included, is available.
    pub fn reset_deck(&mut self) {
        self.available = self.all_cards.iter().map(Threat::uid).collect();
        self.discarded.clear();
        self.destroyed.clear();
        tracing::debug!(available = self.available.len(), "Threat deck reset");
        self.check_partition();
    }

    /// Rebuild the available list from every card that has not been destroyed.
    pub fn reform_deck(&mut self) {
        let destroyed = &self.destroyed;
        self.available = self
            .all_cards
            .iter()
            .map(Threat::uid)
            .filter(|id| !destroyed.contains(id))
            .collect();
        self.discarded.clear();
        tracing::debug!(
            available = self.available.len(),
            destroyed = self.destroyed.len(),
            "Threat deck reformed"
        );
        self.check_partition();
    }

    /// Shuffle the available cards.
    ///
    /// When the deck is reproducible and `use_reproducible` is set, the random
    /// source is rewound first, so the same starting order always yields the
    /// same permutation. Otherwise the continuing stream is used.
    pub fn shuffle_deck(&mut self, use_reproducible: bool) {
        let rewound = self.rng.is_reproducible() && use_reproducible;
        if rewound {
            self.rng.reset();
        }
        self.rng.shuffle(&mut self.available);
        tracing::debug!(
            available = self.available.len(),
            rewound,
            "Threat deck shuffled"
        );
    }

    /// Take the top card, or `None` if no cards are available.
    pub fn draw_card(&mut self) -> Option<ThreatId> {
        if self.available.is_empty() {
            return None;
        }
        Some(self.available.remove(0))
    }

    /// Move a card into the discard pile.
    ///
    /// Removes the card from the available list if it is there and appends it
    /// to the discard pile unless it is already discarded. Destroyed cards stay
    /// destroyed.
    pub fn discard_card(&mut self, id: ThreatId) -> Result<(), DeckError> {
        self.ensure_known(id)?;
        if self.destroyed.contains(&id) {
            tracing::warn!(card = id, "Ignoring discard of a destroyed card");
            return Ok(());
        }
        self.available.retain(|&card| card != id);
        if !self.discarded.contains(&id) {
            self.discarded.push(id);
        }
        self.check_partition();
        Ok(())
    }

    /// Move a card out of play.
    ///
    /// Removes the card from the available and discarded lists and appends
    /// it to the destroyed list unless it is already there.
    pub fn destroy_card(&mut self, id: ThreatId) -> Result<(), DeckError> {
        self.ensure_known(id)?;
        self.available.retain(|&card| card != id);
        self.discarded.retain(|&card| card != id);
        if !self.destroyed.contains(&id) {
            self.destroyed.push(id);
        }
        self.check_partition();
        Ok(())
    }

    /// Replace all three working lists, e.g. when loading a saved game.
    ///
    /// Every id must belong to this deck and no id may appear twice.
    pub fn restore_lists(
        &mut self,
        available: Vec<ThreatId>,
        discarded: Vec<ThreatId>,
        destroyed: Vec<ThreatId>,
    ) -> Result<(), DeckError> {
        let mut seen = std::collections::HashSet::new();
        for &id in available.iter().chain(&discarded).chain(&destroyed) {
            self.ensure_known(id)?;
            if !seen.insert(id) {
                return Err(DeckError::OverlappingLists(id));
            }
        }
        self.available = available;
        self.discarded = discarded;
        self.destroyed = destroyed;
        Ok(())
    }

    /// Whether every card is in at most one working list.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.available
            .iter()
            .chain(&self.discarded)
            .chain(&self.destroyed)
            .all(|id| seen.insert(*id))
    }

    fn ensure_known(&self, id: ThreatId) -> Result<(), DeckError> {
        if self.index.contains_key(&id) {
            Ok(())
        } else {
            Err(DeckError::UnknownCard(id))
        }
    }

    #[cfg(feature = "debug-validation")]
    fn check_partition(&self) {
        debug_assert!(self.is_partitioned(), "threat deck lists overlap");
    }

    #[cfg(not(feature = "debug-validation"))]
    #[allow(clippy::unused_self)]
    fn check_partition(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ActivationEntry, ExternalThreatCardData, ThreatCardData};

    fn card(name: &str) -> ThreatCardData {
        ThreatCardData {
            name: name.to_string(),
            effect_text: format!("{name} effect"),
            activation_list: vec![ActivationEntry { activation_value: 1 }],
            away_missions: ron::Value::Unit,
        }
    }

    fn catalogue(size: usize) -> ThreatCatalogue {
        ThreatCatalogue {
            threats: (0..size).map(|i| card(&format!("threat {i}"))).collect(),
            external_threats: vec![ExternalThreatCardData {
                name: "Raiders".to_string(),
                effect_text: "Deal 2 damage.".to_string(),
                activation_list: Vec::new(),
                away_missions: ron::Value::Unit,
                starting_health: 3,
            }],
            internal_threats: vec![card("Boarders")],
        }
    }

    fn deck(size: usize, rng: RandomSource) -> ThreatDeck {
        let mut ids = IdAllocator::new();
        ThreatDeck::from_catalogue(&catalogue(size), &mut ids, rng)
    }

    #[test]
    fn test_load_orders_categories() {
        let deck = deck(2, RandomSource::entropy());
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.all_cards()[0].name(), "threat 0");
        assert_eq!(deck.all_cards()[2].name(), "Raiders");
        assert_eq!(deck.all_cards()[3].name(), "Boarders");
        assert!(deck.available_cards().is_empty());
    }

    #[test]
    fn test_load_assigns_distinct_ids() {
        let deck = deck(10, RandomSource::entropy());
        let ids: Vec<ThreatId> = deck.all_cards().iter().map(Threat::uid).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_reset_makes_everything_available() {
        let mut deck = deck(5, RandomSource::entropy());
        deck.reset_deck();
        let first = deck.draw_card().unwrap();
        deck.destroy_card(first).unwrap();
        deck.reset_deck();
        assert_eq!(deck.available_cards().len(), deck.len());
        assert!(deck.discarded_cards().is_empty());
        assert!(deck.destroyed_cards().is_empty());
    }

    #[test]
    fn test_draw_takes_top_card() {
        let mut deck = deck(3, RandomSource::entropy());
        deck.reset_deck();
        let top = deck.available_cards()[0];
        assert_eq!(deck.draw_card(), Some(top));
        assert_eq!(deck.available_cards().len(), deck.len() - 1);
        assert_eq!(deck.location_of(top), None);
    }

    #[test]
    fn test_draw_empty_returns_none() {
        let mut deck = deck(0, RandomSource::entropy());
        assert_eq!(deck.draw_card(), None);
        deck.reset_deck();
        while deck.draw_card().is_some() {}
        assert_eq!(deck.draw_card(), None);
    }

    #[test]
    fn test_discard_is_idempotent() {
        let mut deck = deck(3, RandomSource::entropy());
        deck.reset_deck();
        let id = deck.available_cards()[1];
        deck.discard_card(id).unwrap();
        deck.discard_card(id).unwrap();
        assert_eq!(deck.discarded_cards(), &[id]);
        assert!(!deck.available_cards().contains(&id));
        assert!(deck.is_partitioned());
    }

    #[test]
    fn test_destroy_moves_from_discard() {
        let mut deck = deck(3, RandomSource::entropy());
        deck.reset_deck();
        let id = deck.draw_card().unwrap();
        deck.discard_card(id).unwrap();
        deck.destroy_card(id).unwrap();
        deck.destroy_card(id).unwrap();
        assert!(deck.discarded_cards().is_empty());
        assert_eq!(deck.destroyed_cards(), &[id]);
        assert_eq!(deck.location_of(id), Some(CardLocation::Destroyed));
    }

    #[test]
    fn test_discarding_destroyed_card_is_ignored() {
        let mut deck = deck(3, RandomSource::entropy());
        deck.reset_deck();
        let id = deck.available_cards()[0];
        deck.destroy_card(id).unwrap();
        deck.discard_card(id).unwrap();
        assert!(deck.discarded_cards().is_empty());
        assert!(deck.is_partitioned());
    }

    #[test]
    fn test_unknown_card_rejected() {
        let mut deck = deck(3, RandomSource::entropy());
        deck.reset_deck();
        assert_eq!(deck.discard_card(42), Err(DeckError::UnknownCard(42)));
        assert_eq!(deck.destroy_card(42), Err(DeckError::UnknownCard(42)));
    }

    #[test]
    fn test_reform_excludes_destroyed() {
        let mut deck = deck(6, RandomSource::entropy());
        deck.reset_deck();
        let destroyed = deck.draw_card().unwrap();
        let discarded = deck.draw_card().unwrap();
        deck.destroy_card(destroyed).unwrap();
        deck.discard_card(discarded).unwrap();

        deck.reform_deck();

        assert!(!deck.available_cards().contains(&destroyed));
        assert_eq!(deck.destroyed_cards(), &[destroyed]);
        assert!(deck.discarded_cards().is_empty());
        assert_eq!(deck.available_cards().len(), deck.len() - 1);
        assert!(deck.available_cards().contains(&discarded));
    }

    #[test]
    fn test_reproducible_shuffle_repeats() {
        let mut deck = deck(30, RandomSource::reproducible(Some(2020)));
        deck.reset_deck();
        deck.shuffle_deck(true);
        let first = deck.available_cards().to_vec();

        deck.reset_deck();
        deck.shuffle_deck(true);
        assert_eq!(deck.available_cards(), first.as_slice());
    }

    #[test]
    fn test_continuing_stream_differs() {
        let mut deck = deck(30, RandomSource::reproducible(Some(2020)));
        deck.reset_deck();
        deck.shuffle_deck(true);
        let first = deck.available_cards().to_vec();

        deck.reset_deck();
        deck.shuffle_deck(false);
        assert_ne!(deck.available_cards(), first.as_slice());
    }

    #[test]
    fn test_entropy_deck_ignores_reproducible_flag() {
        let mut deck = deck(30, RandomSource::new(false, Some(2020)));
        assert!(!deck.rng().is_reproducible());
        assert_eq!(deck.rng().seed(), None);

        deck.reset_deck();
        let loaded = deck.available_cards().to_vec();
        deck.shuffle_deck(true);
        let first = deck.available_cards().to_vec();

        deck.reset_deck();
        deck.shuffle_deck(true);
        let second = deck.available_cards().to_vec();

        // 32 cards: a repeated or identity permutation is vanishingly unlikely.
        assert_ne!(first, second);
        assert_ne!(first, loaded);
        let mut sorted = second.clone();
        sorted.sort_unstable();
        let mut expected = loaded;
        expected.sort_unstable();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_card_mut_damages_external_threat() {
        let mut deck = deck(1, RandomSource::entropy());
        let raiders = deck.all_cards()[1].uid();
        deck.card_mut(raiders).unwrap().dec_health(2);
        assert_eq!(deck.card(raiders).unwrap().health().unwrap().current(), 1);
    }

    #[test]
    fn test_restore_lists_rejects_overlap() {
        let mut deck = deck(3, RandomSource::entropy());
        let a = deck.id_at(0).unwrap();
        let b = deck.id_at(1).unwrap();
        assert_eq!(
            deck.restore_lists(vec![a, b], vec![a], Vec::new()),
            Err(DeckError::OverlappingLists(a))
        );
        deck.restore_lists(vec![b], vec![a], Vec::new()).unwrap();
        assert_eq!(deck.location_of(a), Some(CardLocation::Discarded));
        assert_eq!(deck.catalogue_index(b), Some(1));
    }
}
