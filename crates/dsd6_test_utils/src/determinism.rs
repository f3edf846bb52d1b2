//! Determinism testing utilities.
//!
//! Provides a harness for verifying that reproducible random sources produce
//! identical shuffles and rolls given identical seeds.
//!
//! # Testing Strategy
//!
//! A reproducible deck must replay the same shuffle for the same seed, and
//! must replay it again after [`RandomSource::reset`]. Sources of
//! non-determinism include:
//!
//! - **HashMap iteration order**: the deck keeps its lists in `Vec`s and
//!   only uses its id index for lookups.
//! - **Entropy-seeded generators**: only sources built with
//!   `reproducible = true` are expected to repeat.
//! - **Id allocation**: card ids depend on everything allocated before the
//!   deck, so comparisons use catalogue indices rather than ids.
//!
//! [`RandomSource::reset`]: dsd6_core::rng::RandomSource::reset

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dsd6_core::data::ThreatCatalogue;
use dsd6_core::identity::IdAllocator;
use dsd6_core::rng::RandomSource;
use dsd6_core::threat_deck::ThreatDeck;
use dsd6_core::threats::ThreatId;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Runs are non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup/play/hash cycle several times and compare the hashes.
///
/// # Example
///
/// ```
/// use dsd6_test_utils::determinism::verify_determinism;
///
/// let result = verify_determinism(3, || 0u64, |n| *n += 1, |n| *n);
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Play, HashFn>(
    runs: usize,
    setup: Setup,
    play: Play,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Play: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);
    for _ in 0..runs {
        let mut state = setup();
        play(&mut state);
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Shuffle order of a freshly loaded deck, as catalogue indices.
#[must_use]
pub fn shuffled_order(catalogue: &ThreatCatalogue, seed: u64) -> Vec<usize> {
    let mut deck = ThreatDeck::from_catalogue(
        catalogue,
        &mut IdAllocator::new(),
        RandomSource::reproducible(Some(seed)),
    );
    deck.reset_deck();
    deck.shuffle_deck(true);
    catalogue_indices(&deck, deck.available_cards())
}

/// Map card ids to catalogue indices, dropping ids outside the deck.
#[must_use]
pub fn catalogue_indices(deck: &ThreatDeck, ids: &[ThreatId]) -> Vec<usize> {
    ids.iter()
        .filter_map(|&id| deck.catalogue_index(id))
        .collect()
}

/// Check that `runs` independently built decks shuffle identically for `seed`.
pub fn verify_shuffle_determinism(
    catalogue: &ThreatCatalogue,
    seed: u64,
    runs: usize,
) -> DeterminismResult {
    verify_determinism(
        runs,
        || shuffled_order(catalogue, seed),
        |_| {},
        compute_hash,
    )
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for deck, ship and dice tests.
pub mod strategies {
    use proptest::prelude::*;

    /// One operation on a threat deck. Card arguments index the catalogue.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum DeckOp {
        /// `reset_deck`.
        Reset,
        /// `reform_deck`.
        Reform,
        /// `shuffle_deck` with the given reproducibility.
        Shuffle(bool),
        /// `draw_card`.
        Draw,
        /// `discard_card` on the card at this catalogue index.
        Discard(usize),
        /// `destroy_card` on the card at this catalogue index.
        Destroy(usize),
    }

    /// One transfer between the crew pool and the infirmary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CrewOp {
        /// `move_crew_to_infirmary`.
        ToInfirmary(i32),
        /// `move_crew_from_infirmary`.
        FromInfirmary(i32),
        /// `clear_infirmary`.
        Clear,
    }

    /// Generate a deck operation for a catalogue of `cards` cards.
    pub fn arb_deck_op(cards: usize) -> impl Strategy<Value = DeckOp> {
        let card = 0..cards.max(1);
        prop_oneof![
            1 => Just(DeckOp::Reset),
            1 => Just(DeckOp::Reform),
            1 => any::<bool>().prop_map(DeckOp::Shuffle),
            3 => Just(DeckOp::Draw),
            2 => card.clone().prop_map(DeckOp::Discard),
            1 => card.prop_map(DeckOp::Destroy),
        ]
    }

    /// Generate a sequence of deck operations.
    pub fn arb_deck_ops(cards: usize, max_len: usize) -> impl Strategy<Value = Vec<DeckOp>> {
        proptest::collection::vec(arb_deck_op(cards), 0..max_len)
    }

    /// Generate signed crew amounts, negatives included.
    pub fn arb_crew_amount() -> impl Strategy<Value = i32> {
        -5i32..12i32
    }

    /// Generate a crew transfer.
    pub fn arb_crew_op() -> impl Strategy<Value = CrewOp> {
        prop_oneof![
            3 => arb_crew_amount().prop_map(CrewOp::ToInfirmary),
            3 => arb_crew_amount().prop_map(CrewOp::FromInfirmary),
            1 => Just(CrewOp::Clear),
        ]
    }

    /// Generate a sequence of crew transfers.
    pub fn arb_crew_ops(max_len: usize) -> impl Strategy<Value = Vec<CrewOp>> {
        proptest::collection::vec(arb_crew_op(), 0..max_len)
    }

    /// Generate a ship complement (1-12).
    pub fn arb_complement() -> impl Strategy<Value = u32> {
        1u32..12u32
    }

    /// Generate a random seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    /// Generate die face counts (1-20).
    pub fn arb_die_sides() -> impl Strategy<Value = u32> {
        1u32..=20u32
    }
}
