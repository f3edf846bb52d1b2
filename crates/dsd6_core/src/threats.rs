//! Threat cards.
//!
//! The three card families share one record type; the family lives in
//! [`ThreatKind`] and only external threats carry health.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{ActivationEntry, ExternalThreatCardData, ThreatCardData};
use crate::identity::{EntityId, IdAllocator};

/// Identifier of a threat card.
pub type ThreatId = EntityId;

/// Health pool of an external threat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    starting: u32,
    current: u32,
}

impl Health {
    /// Full health pool.
    #[must_use]
    pub const fn new(starting: u32) -> Self {
        Self {
            starting,
            current: starting,
        }
    }

    /// Health at full strength.
    #[must_use]
    pub const fn starting(&self) -> u32 {
        self.starting
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Threats printed without health (e.g. solar winds) never track damage.
    #[must_use]
    pub const fn uses_health(&self) -> bool {
        self.starting > 0
    }

    /// Heal, capped at the starting value.
    pub fn inc(&mut self, delta: u32) {
        self.current = self.current.saturating_add(delta).min(self.starting);
    }

    /// Damage, floored at zero.
    pub fn dec(&mut self, delta: u32) {
        self.current = self.current.saturating_sub(delta);
    }

    /// Overwrite the current value, clamped into `[0, starting]`.
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.starting);
    }
}

/// Card family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatKind {
    /// Plain threat.
    Plain,
    /// Threat outside the ship, optionally with health.
    External(Health),
    /// Threat inside the ship.
    Internal,
}

/// A threat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threat {
    uid: ThreatId,
    name: String,
    effect_text: String,
    activation_list: Vec<u32>,
    away_missions: ron::Value,
    kind: ThreatKind,
}

impl Threat {
    /// Build a card, taking a fresh id from `ids`.
    #[must_use]
    pub fn new(
        ids: &mut IdAllocator,
        name: impl Into<String>,
        effect_text: impl Into<String>,
        activation_list: Vec<u32>,
        away_missions: ron::Value,
        kind: ThreatKind,
    ) -> Self {
        Self {
            uid: ids.next_id(),
            name: name.into(),
            effect_text: effect_text.into(),
            activation_list,
            away_missions,
            kind,
        }
    }

    /// Build a plain threat from catalogue data.
    #[must_use]
    pub fn plain_from_data(ids: &mut IdAllocator, data: &ThreatCardData) -> Self {
        Self::new(
            ids,
            &data.name,
            &data.effect_text,
            activation_values(&data.activation_list),
            data.away_missions.clone(),
            ThreatKind::Plain,
        )
    }

    /// Build an internal threat from catalogue data.
    #[must_use]
    pub fn internal_from_data(ids: &mut IdAllocator, data: &ThreatCardData) -> Self {
        Self::new(
            ids,
            &data.name,
            &data.effect_text,
            activation_values(&data.activation_list),
            data.away_missions.clone(),
            ThreatKind::Internal,
        )
    }

    /// Build an external threat from catalogue data.
    #[must_use]
    pub fn external_from_data(ids: &mut IdAllocator, data: &ExternalThreatCardData) -> Self {
        Self::new(
            ids,
            &data.name,
            &data.effect_text,
            activation_values(&data.activation_list),
            data.away_missions.clone(),
            ThreatKind::External(Health::new(data.starting_health)),
        )
    }

    /// Card id.
    #[must_use]
    pub const fn uid(&self) -> ThreatId {
        self.uid
    }

    /// Card title.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules text.
    #[must_use]
    pub fn effect_text(&self) -> &str {
        &self.effect_text
    }

    /// Threat die values that activate this card.
    #[must_use]
    pub fn activation_list(&self) -> &[u32] {
        &self.activation_list
    }

    /// Away mission data as loaded.
    #[must_use]
    pub const fn away_missions(&self) -> &ron::Value {
        &self.away_missions
    }

    /// Card family.
    #[must_use]
    pub const fn kind(&self) -> &ThreatKind {
        &self.kind
    }

    /// Whether a threat die showing `value` activates this card.
    #[must_use]
    pub fn activates_on(&self, value: u32) -> bool {
        self.activation_list.contains(&value)
    }

    /// Health of an external threat.
    #[must_use]
    pub const fn health(&self) -> Option<&Health> {
        match &self.kind {
            ThreatKind::External(health) => Some(health),
            ThreatKind::Plain | ThreatKind::Internal => None,
        }
    }

    /// Mutable health of an external threat.
    pub fn health_mut(&mut self) -> Option<&mut Health> {
        match &mut self.kind {
            ThreatKind::External(health) => Some(health),
            ThreatKind::Plain | ThreatKind::Internal => None,
        }
    }

    /// Whether the card is an external threat that tracks health.
    #[must_use]
    pub const fn uses_health(&self) -> bool {
        match self.health() {
            Some(health) => health.uses_health(),
            None => false,
        }
    }

    /// Heal an external threat. Other kinds are unaffected.
    pub fn inc_health(&mut self, delta: u32) {
        if let Some(health) = self.health_mut() {
            health.inc(delta);
        }
    }

    /// Damage an external threat. Other kinds are unaffected.
    pub fn dec_health(&mut self, delta: u32) {
        if let Some(health) = self.health_mut() {
            health.dec(delta);
        }
    }
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ThreatKind::Plain => write!(
                f,
                "Threat-{}> [{}] [{}] {:?}",
                self.uid, self.name, self.effect_text, self.activation_list
            ),
            ThreatKind::External(health) => write!(
                f,
                "External-Threat-{}> [{}] [{}] [{}] {:?}",
                self.uid,
                self.name,
                self.effect_text,
                health.starting(),
                self.activation_list
            ),
            ThreatKind::Internal => write!(
                f,
                "Internal-Threat-{}> [{}] [{}] {:?}",
                self.uid, self.name, self.effect_text, self.activation_list
            ),
        }
    }
}

fn activation_values(entries: &[ActivationEntry]) -> Vec<u32> {
    entries.iter().map(|entry| entry.activation_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::FIRST_UID;

    fn external(ids: &mut IdAllocator, starting_health: u32) -> Threat {
        Threat::external_from_data(
            ids,
            &ExternalThreatCardData {
                name: "Raiders".to_string(),
                effect_text: "Deal 2 damage.".to_string(),
                activation_list: vec![
                    ActivationEntry { activation_value: 4 },
                    ActivationEntry { activation_value: 5 },
                ],
                away_missions: ron::Value::Unit,
                starting_health,
            },
        )
    }

    #[test]
    fn test_external_starts_full() {
        let mut ids = IdAllocator::new();
        let card = external(&mut ids, 3);
        assert_eq!(card.uid(), FIRST_UID);
        assert_eq!(card.health().unwrap().current(), 3);
        assert!(card.uses_health());
        assert_eq!(card.activation_list(), &[4, 5]);
    }

    #[test]
    fn test_health_clamps() {
        let mut ids = IdAllocator::new();
        let mut card = external(&mut ids, 3);
        card.dec_health(10);
        assert_eq!(card.health().unwrap().current(), 0);
        card.inc_health(1);
        assert_eq!(card.health().unwrap().current(), 1);
        card.inc_health(99);
        assert_eq!(card.health().unwrap().current(), 3);
    }

    #[test]
    fn test_zero_health_threat_does_not_use_health() {
        let mut ids = IdAllocator::new();
        let card = external(&mut ids, 0);
        assert!(!card.uses_health());
    }

    #[test]
    fn test_plain_and_internal_have_no_health() {
        let mut ids = IdAllocator::new();
        let data = ThreatCardData {
            name: "Panel Explosion".to_string(),
            effect_text: "Lock a die.".to_string(),
            activation_list: vec![ActivationEntry { activation_value: 6 }],
            away_missions: ron::Value::Unit,
        };
        let mut plain = Threat::plain_from_data(&mut ids, &data);
        let internal = Threat::internal_from_data(&mut ids, &data);
        assert!(plain.health().is_none());
        assert!(!internal.uses_health());
        assert_eq!(internal.kind(), &ThreatKind::Internal);
        plain.dec_health(1);
        assert_eq!(plain.kind(), &ThreatKind::Plain);
        assert!(internal.uid() > plain.uid());
    }

    #[test]
    fn test_activates_on() {
        let mut ids = IdAllocator::new();
        let card = external(&mut ids, 2);
        assert!(card.activates_on(4));
        assert!(!card.activates_on(1));
    }

    #[test]
    fn test_display_prefix_per_kind() {
        let mut ids = IdAllocator::starting_at(5);
        let card = external(&mut ids, 3);
        assert_eq!(
            card.to_string(),
            "External-Threat-5> [Raiders] [Deal 2 damage.] [3] [4, 5]"
        );
    }

    #[test]
    fn test_health_set_clamps() {
        let mut health = Health::new(4);
        health.set(9);
        assert_eq!(health.current(), 4);
        health.set(1);
        assert_eq!(health.current(), 1);
    }
}
