//! Reproducible deck dumps.
//!
//! Prints the order a reproducible deck deals its cards for a seed, so a
//! daily challenge deck can be checked by eye.

use std::fmt;

use dsd6_core::data::ThreatCatalogue;
use dsd6_core::identity::IdAllocator;
use dsd6_core::rng::RandomSource;
use dsd6_core::threat_deck::ThreatDeck;
use dsd6_core::threats::ThreatKind;
use serde::Serialize;

/// One card in dealing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealtCard {
    /// 1-based position in the deck.
    pub position: usize,
    /// Index in the catalogue.
    pub catalogue_index: usize,
    /// Card family.
    pub kind: &'static str,
    /// Card title.
    pub name: String,
}

impl fmt::Display for DealtCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}. [{:<8}] {}", self.position, self.kind, self.name)
    }
}

/// Reset and shuffle a reproducible deck for `seed`, then draw it out.
#[must_use]
pub fn deal(catalogue: &ThreatCatalogue, seed: u64) -> Vec<DealtCard> {
    let mut deck = ThreatDeck::from_catalogue(
        catalogue,
        &mut IdAllocator::new(),
        RandomSource::reproducible(Some(seed)),
    );
    deck.reset_deck();
    deck.shuffle_deck(true);

    let mut dealt = Vec::with_capacity(deck.len());
    while let Some(id) = deck.draw_card() {
        let (Some(card), Some(catalogue_index)) = (deck.card(id), deck.catalogue_index(id)) else {
            continue;
        };
        dealt.push(DealtCard {
            position: dealt.len() + 1,
            catalogue_index,
            kind: match card.kind() {
                ThreatKind::Plain => "threat",
                ThreatKind::External(_) => "external",
                ThreatKind::Internal => "internal",
            },
            name: card.name().to_string(),
        });
    }
    dealt
}
