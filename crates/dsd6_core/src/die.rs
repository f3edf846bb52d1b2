//! N-sided dice.

use std::fmt;

use crate::rng::RandomSource;

/// Faces of the game's threat die.
pub const THREAT_DIE_FACES: [&str; 6] = ["One", "Two", "Three", "Four", "Five", "Six"];

/// Faces of the game's crew die.
pub const CREW_DIE_FACES: [&str; 6] = [
    "Commander",
    "Tactical",
    "Medical",
    "Science",
    "Engineering",
    "Threat-Detected",
];

/// A die with `sides` faces and optional face labels.
///
/// A die with fewer than one side always rolls 1.
#[derive(Debug, Clone)]
pub struct Die {
    name: String,
    sides: u32,
    faces: Vec<String>,
    last_roll: Option<u32>,
    rng: RandomSource,
}

impl Die {
    /// Create a die backed by the given random source.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        sides: u32,
        faces: Vec<String>,
        rng: RandomSource,
    ) -> Self {
        Self {
            name: name.into(),
            sides,
            faces,
            last_roll: None,
            rng,
        }
    }

    /// Six-sided threat die with numeric face labels.
    #[must_use]
    pub fn threat_die(rng: RandomSource) -> Self {
        Self::new("Threat-Die", 6, labels(&THREAT_DIE_FACES), rng)
    }

    /// Six-sided crew die with crew-role face labels.
    #[must_use]
    pub fn crew_die(rng: RandomSource) -> Self {
        Self::new("Crew-Die", 6, labels(&CREW_DIE_FACES), rng)
    }

    /// Die name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of sides.
    #[must_use]
    pub const fn sides(&self) -> u32 {
        self.sides
    }

    /// Face labels, first entry belongs to side 1.
    #[must_use]
    pub fn faces(&self) -> &[String] {
        &self.faces
    }

    /// Result of the most recent roll.
    #[must_use]
    pub const fn last_roll(&self) -> Option<u32> {
        self.last_roll
    }

    /// Random source backing this die.
    #[must_use]
    pub const fn rng(&self) -> &RandomSource {
        &self.rng
    }

    /// Roll the die and remember the result.
    pub fn roll(&mut self) -> u32 {
        let value = if self.sides < 1 {
            1
        } else {
            self.rng.roll_uniform(1, self.sides)
        };
        self.last_roll = Some(value);
        value
    }

    /// Label of the 1-indexed `side`, if the die has that side and a label for it.
    #[must_use]
    pub fn face_at_side(&self, side: u32) -> Option<&str> {
        if side == 0 || side > self.sides {
            return None;
        }
        let index = usize::try_from(side - 1).ok()?;
        self.faces.get(index).map(String::as_str)
    }

    /// Label of the last roll.
    #[must_use]
    pub fn last_face(&self) -> Option<&str> {
        self.last_roll.and_then(|side| self.face_at_side(side))
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sided {} that is {}", self.sides, self.name, self.rng)
    }
}

fn labels(faces: &[&str]) -> Vec<String> {
    faces.iter().map(|face| (*face).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sided_die_rolls_one() {
        let mut die = Die::new("Blank", 0, Vec::new(), RandomSource::entropy());
        for _ in 0..100 {
            assert_eq!(die.roll(), 1);
        }
        assert_eq!(die.last_roll(), Some(1));
    }

    #[test]
    fn test_d6_stays_in_range() {
        let mut die = Die::threat_die(RandomSource::entropy());
        for _ in 0..10_000 {
            let value = die.roll();
            assert!((1..=6).contains(&value));
        }
    }

    #[test]
    fn test_d6_hits_every_side() {
        let mut die = Die::crew_die(RandomSource::reproducible(Some(11)));
        let mut seen = [false; 6];
        for _ in 0..1000 {
            seen[(die.roll() - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_no_roll_yet() {
        let die = Die::threat_die(RandomSource::entropy());
        assert_eq!(die.last_roll(), None);
        assert_eq!(die.last_face(), None);
    }

    #[test]
    fn test_face_at_side() {
        let die = Die::crew_die(RandomSource::entropy());
        assert_eq!(die.face_at_side(1), Some("Commander"));
        assert_eq!(die.face_at_side(6), Some("Threat-Detected"));
        assert_eq!(die.face_at_side(0), None);
        assert_eq!(die.face_at_side(7), None);
    }

    #[test]
    fn test_face_at_side_with_short_face_list() {
        let die = Die::new(
            "Partial",
            6,
            vec!["A".to_string(), "B".to_string()],
            RandomSource::entropy(),
        );
        assert_eq!(die.face_at_side(2), Some("B"));
        assert_eq!(die.face_at_side(3), None);
    }

    #[test]
    fn test_last_face_follows_roll() {
        let mut die = Die::threat_die(RandomSource::reproducible(Some(4)));
        let side = die.roll();
        assert_eq!(die.last_face(), die.face_at_side(side));
    }

    #[test]
    fn test_reproducible_dice_agree() {
        let mut a = Die::threat_die(RandomSource::reproducible(Some(99)));
        let mut b = Die::threat_die(RandomSource::reproducible(Some(99)));
        let rolls_a: Vec<u32> = (0..30).map(|_| a.roll()).collect();
        let rolls_b: Vec<u32> = (0..30).map(|_| b.roll()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_display() {
        let die = Die::threat_die(RandomSource::reproducible(Some(7)));
        assert_eq!(
            die.to_string(),
            "6 sided Threat-Die that is reproducible with seed 7"
        );
    }
}
