//! The player's ship and its resource pools.
//!
//! All pool operations clamp their input instead of failing: negative
//! amounts act as zero and oversized amounts are cut to what is there.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{DataError, ShipData};
use crate::identity::{EntityId, IdAllocator};
use crate::threats::ThreatId;

/// Crew, shield, hull and infirmary pools of the ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    uid: EntityId,
    name: String,
    complement: u32,
    available_crew: u32,
    infirmary_count: u32,
    full_shield_points: u32,
    shield_points: u32,
    full_hull_points: u32,
    hull_points: u32,
    threats_detected: u32,
    external_threats: Vec<ThreatId>,
    internal_threats: Vec<ThreatId>,
}

impl Ship {
    /// Build a ship at full strength from its definition.
    pub fn from_data(data: &ShipData, ids: &mut IdAllocator) -> Result<Self, DataError> {
        data.validate()?;
        Ok(Self {
            uid: ids.next_id(),
            name: data.name.clone(),
            complement: data.complement,
            available_crew: data.complement,
            infirmary_count: 0,
            full_shield_points: data.shield_points,
            shield_points: data.shield_points,
            full_hull_points: data.hull_points,
            hull_points: data.hull_points,
            threats_detected: 0,
            external_threats: Vec::new(),
            internal_threats: Vec::new(),
        })
    }

    /// Ship id.
    #[must_use]
    pub const fn uid(&self) -> EntityId {
        self.uid
    }

    /// Ship name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total crew.
    #[must_use]
    pub const fn complement(&self) -> u32 {
        self.complement
    }

    /// Crew fit for duty.
    #[must_use]
    pub const fn available_crew(&self) -> u32 {
        self.available_crew
    }

    /// Crew out of action.
    #[must_use]
    pub const fn infirmary_count(&self) -> u32 {
        self.infirmary_count
    }

    /// Shield points at full strength.
    #[must_use]
    pub const fn full_shield_points(&self) -> u32 {
        self.full_shield_points
    }

    /// Current shield points.
    #[must_use]
    pub const fn shield_points(&self) -> u32 {
        self.shield_points
    }

    /// Hull points at full strength.
    #[must_use]
    pub const fn full_hull_points(&self) -> u32 {
        self.full_hull_points
    }

    /// Current hull points.
    #[must_use]
    pub const fn hull_points(&self) -> u32 {
        self.hull_points
    }

    /// Threats detected so far.
    #[must_use]
    pub const fn threats_detected(&self) -> u32 {
        self.threats_detected
    }

    /// External threats currently engaging the ship.
    #[must_use]
    pub fn external_threats(&self) -> &[ThreatId] {
        &self.external_threats
    }

    /// Internal threats currently aboard the ship.
    #[must_use]
    pub fn internal_threats(&self) -> &[ThreatId] {
        &self.internal_threats
    }

    /// Whether the hull has been reduced to zero.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.hull_points == 0
    }

    /// Send up to `amount` crew to the infirmary.
    pub fn move_crew_to_infirmary(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.available_crew);
        self.available_crew -= amount;
        self.infirmary_count += amount;
        tracing::debug!(
            amount,
            available = self.available_crew,
            infirmary = self.infirmary_count,
            "Crew moved to infirmary"
        );
    }

    /// Return up to `amount` crew from the infirmary.
    pub fn move_crew_from_infirmary(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.infirmary_count);
        self.infirmary_count -= amount;
        self.available_crew += amount;
        tracing::debug!(
            amount,
            available = self.available_crew,
            infirmary = self.infirmary_count,
            "Crew returned from infirmary"
        );
    }

    /// Return every crew member to duty.
    pub fn clear_infirmary(&mut self) {
        self.infirmary_count = 0;
        self.available_crew = self.complement;
    }

    /// Count newly detected threats. Negative amounts count as zero.
    pub fn add_threats_detected(&mut self, amount: i32) {
        let amount = u32::try_from(amount).unwrap_or(0);
        self.threats_detected = self.threats_detected.saturating_add(amount);
    }

    /// Remove detected threats. Negative amounts count as zero and the
    /// counter stops at zero.
    pub fn remove_threats_detected(&mut self, amount: i32) {
        let amount = u32::try_from(amount).unwrap_or(0);
        self.threats_detected = self.threats_detected.saturating_sub(amount);
    }

    /// Reset the detected counter.
    pub fn clear_threats_detected(&mut self) {
        self.threats_detected = 0;
    }

    /// Take shield damage; shields stop at zero.
    pub fn damage_shields(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.shield_points);
        self.shield_points -= amount;
    }

    /// Restore shields up to full strength.
    pub fn repair_shields(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.full_shield_points - self.shield_points);
        self.shield_points += amount;
    }

    /// Take hull damage; the hull stops at zero.
    pub fn damage_hull(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.hull_points);
        self.hull_points -= amount;
        if self.hull_points == 0 {
            tracing::info!(ship = %self.name, "Hull breached");
        }
    }

    /// Restore hull up to full strength.
    pub fn repair_hull(&mut self, amount: i32) {
        let amount = clamp_amount(amount, self.full_hull_points - self.hull_points);
        self.hull_points += amount;
    }

    /// Record an external threat engaging the ship. Returns `false` if it was already tracked.
    pub fn add_external_threat(&mut self, id: ThreatId) -> bool {
        push_unique(&mut self.external_threats, id)
    }

    /// Stop tracking an external threat. Returns `false` if it was not tracked.
    pub fn remove_external_threat(&mut self, id: ThreatId) -> bool {
        remove_id(&mut self.external_threats, id)
    }

    /// Record an internal threat aboard the ship. Returns `false` if it was already tracked.
    pub fn add_internal_threat(&mut self, id: ThreatId) -> bool {
        push_unique(&mut self.internal_threats, id)
    }

    /// Stop tracking an internal threat. Returns `false` if it was not tracked.
    pub fn remove_internal_threat(&mut self, id: ThreatId) -> bool {
        remove_id(&mut self.internal_threats, id)
    }

    /// Return to full strength for a new play-through: full crew, shields and
    /// hull, nothing detected and no tracked threats.
    pub fn refit(&mut self) {
        self.clear_infirmary();
        self.shield_points = self.full_shield_points;
        self.hull_points = self.full_hull_points;
        self.threats_detected = 0;
        self.external_threats.clear();
        self.internal_threats.clear();
        tracing::debug!(ship = %self.name, "Ship refitted");
    }

    /// Restore pools captured in a saved game, clamped to the ship's limits.
    pub(crate) fn restore_pools(&mut self, pools: &ShipPools) {
        self.infirmary_count = pools.infirmary_count.min(self.complement);
        self.available_crew = self.complement - self.infirmary_count;
        self.shield_points = pools.shield_points.min(self.full_shield_points);
        self.hull_points = pools.hull_points.min(self.full_hull_points);
        self.threats_detected = pools.threats_detected;
    }

    /// Replace the tracked threat lists.
    pub(crate) fn restore_threats(&mut self, external: Vec<ThreatId>, internal: Vec<ThreatId>) {
        self.external_threats = external;
        self.internal_threats = internal;
    }

    /// Current pool values.
    #[must_use]
    pub const fn pools(&self) -> ShipPools {
        ShipPools {
            infirmary_count: self.infirmary_count,
            shield_points: self.shield_points,
            hull_points: self.hull_points,
            threats_detected: self.threats_detected,
        }
    }
}

/// Mutable pool values of a ship, as stored in a saved game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipPools {
    /// Crew in the infirmary.
    pub infirmary_count: u32,
    /// Current shield points.
    pub shield_points: u32,
    /// Current hull points.
    pub hull_points: u32,
    /// Detected threat counter.
    pub threats_detected: u32,
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship: {} has {} Crew, {} Shield Points and {} Hull Points",
            self.name, self.complement, self.shield_points, self.hull_points
        )
    }
}

/// Clamp a signed request into `[0, limit]`.
fn clamp_amount(amount: i32, limit: u32) -> u32 {
    u32::try_from(amount).unwrap_or(0).min(limit)
}

fn push_unique(list: &mut Vec<ThreatId>, id: ThreatId) -> bool {
    if list.contains(&id) {
        return false;
    }
    list.push(id);
    true
}

fn remove_id(list: &mut Vec<ThreatId>, id: ThreatId) -> bool {
    let before = list.len();
    list.retain(|&tracked| tracked != id);
    list.len() != before
}
