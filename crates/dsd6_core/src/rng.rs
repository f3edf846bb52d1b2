//! Random number sources.
//!
//! A [`RandomSource`] is either reproducible (a seeded ChaCha stream that can
//! be rewound to the state it had right after construction) or
//! non-reproducible (an OS-seeded stream that cannot be rewound). The mode is
//! chosen per instance: a threat deck used for a daily challenge can replay an
//! identical shuffle while the dice keep rolling organically.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone)]
enum Generator {
    /// Seeded stream plus a copy of its state at construction.
    Seeded {
        initial: ChaCha8Rng,
        rng: ChaCha8Rng,
    },
    Entropy(StdRng),
}

/// Uniform integer and shuffle source with an optional reproducible mode.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: Option<u64>,
    generator: Generator,
}

impl RandomSource {
    /// Create a source in the requested mode.
    ///
    /// `seed` is only honoured for reproducible sources. A reproducible source
    /// created without a seed derives one from the system clock.
    #[must_use]
    pub fn new(reproducible: bool, seed: Option<u64>) -> Self {
        if reproducible {
            Self::reproducible(seed)
        } else {
            Self::entropy()
        }
    }

    /// Create a reproducible source.
    #[must_use]
    pub fn reproducible(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(clock_seed);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self {
            seed: Some(seed),
            generator: Generator::Seeded {
                initial: rng.clone(),
                rng,
            },
        }
    }

    /// Create a non-reproducible source seeded from the operating system.
    #[must_use]
    pub fn entropy() -> Self {
        Self {
            seed: None,
            generator: Generator::Entropy(StdRng::from_os_rng()),
        }
    }

    /// Whether this source can be rewound.
    #[must_use]
    pub fn is_reproducible(&self) -> bool {
        matches!(self.generator, Generator::Seeded { .. })
    }

    /// Seed of a reproducible source, `None` otherwise.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniformly distributed value in `[low, high]`.
    ///
    /// # Panics
    ///
    /// Panics if `low > high`. Inverted bounds are a programming error.
    pub fn roll_uniform<T>(&mut self, low: T, high: T) -> T
    where
        T: SampleUniform + PartialOrd + Copy + fmt::Debug,
    {
        assert!(
            low <= high,
            "roll_uniform called with inverted bounds [{low:?}, {high:?}]"
        );
        match &mut self.generator {
            Generator::Seeded { rng, .. } => rng.random_range(low..=high),
            Generator::Entropy(rng) => rng.random_range(low..=high),
        }
    }

    /// Shuffle `items` in place using this source's stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        match &mut self.generator {
            Generator::Seeded { rng, .. } => items.shuffle(rng),
            Generator::Entropy(rng) => items.shuffle(rng),
        }
    }

    /// Rewind a reproducible source to its construction state.
    ///
    /// Non-reproducible sources ignore the call.
    pub fn reset(&mut self) {
        if let Generator::Seeded { initial, rng } = &mut self.generator {
            *rng = initial.clone();
        }
    }
}

impl fmt::Display for RandomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.seed {
            Some(seed) if self.is_reproducible() => write!(f, "reproducible with seed {seed}"),
            _ => write!(f, "not reproducible"),
        }
    }
}

/// Nanoseconds since the Unix epoch, folded into 64 bits.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| {
            d.as_secs()
                .wrapping_mul(1_000_000_000)
                .wrapping_add(u64::from(d.subsec_nanos()))
        })
        .unwrap_or_default()
}
