//! Consumable resource types: kinds, costs, and per-character pools.
//!
//! A `ResourcePool` owns the 0 <= current <= max invariant; debits are
//! all-or-nothing so a failed multi-kind cost never leaves a partial charge.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A kind of consumable resource that abilities draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Stamina,
    Mana,
    Focus,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stamina => "stamina",
            Self::Mana => "mana",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stamina" => Ok(Self::Stamina),
            "mana" => Ok(Self::Mana),
            "focus" => Ok(Self::Focus),
            _ => Err(DomainError::parse(format!("Unknown resource kind: {}", s))),
        }
    }
}

/// A validated resource cost: at least one kind, every amount positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<ResourceKind, u32>", into = "BTreeMap<ResourceKind, u32>")]
pub struct ResourceCost(BTreeMap<ResourceKind, u32>);

impl ResourceCost {
    /// Create a validated cost.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the map is empty or any amount is zero.
    pub fn new(amounts: BTreeMap<ResourceKind, u32>) -> Result<Self, DomainError> {
        if amounts.is_empty() {
            return Err(DomainError::validation("Resource cost cannot be empty"));
        }
        if let Some((kind, _)) = amounts.iter().find(|(_, amount)| **amount == 0) {
            return Err(DomainError::validation(format!(
                "Resource cost for {} must be positive",
                kind
            )));
        }
        Ok(Self(amounts))
    }

    /// Convenience constructor for a single-kind cost.
    pub fn of(kind: ResourceKind, amount: u32) -> Result<Self, DomainError> {
        Self::new(BTreeMap::from([(kind, amount)]))
    }

    pub fn amounts(&self) -> &BTreeMap<ResourceKind, u32> {
        &self.0
    }

    pub fn amount_of(&self, kind: ResourceKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }
}

impl TryFrom<BTreeMap<ResourceKind, u32>> for ResourceCost {
    type Error = DomainError;

    fn try_from(amounts: BTreeMap<ResourceKind, u32>) -> Result<Self, Self::Error> {
        Self::new(amounts)
    }
}

impl From<ResourceCost> for BTreeMap<ResourceKind, u32> {
    fn from(cost: ResourceCost) -> Self {
        cost.0
    }
}

/// How much of a kind was missing when a debit failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceShortfall {
    pub kind: ResourceKind,
    pub required: u32,
    pub available: u32,
}

impl ResourceShortfall {
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.available)
    }
}

impl fmt::Display for ResourceShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.kind, self.available, self.required
        )
    }
}

/// A single resource gauge within a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGauge {
    current: u32,
    max: u32,
}

impl ResourceGauge {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `current > max`.
    pub fn new(current: u32, max: u32) -> Result<Self, DomainError> {
        if current > max {
            return Err(DomainError::validation(format!(
                "Resource current {} exceeds maximum {}",
                current, max
            )));
        }
        Ok(Self { current, max })
    }

    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Per-character consumable resource pools.
///
/// Invariant: for every kind, 0 <= current <= max.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    character_id: crate::ids::CharacterId,
    gauges: BTreeMap<ResourceKind, ResourceGauge>,
}

impl ResourcePool {
    pub fn new(
        character_id: crate::ids::CharacterId,
        gauges: BTreeMap<ResourceKind, ResourceGauge>,
    ) -> Self {
        Self {
            character_id,
            gauges,
        }
    }

    pub fn character_id(&self) -> crate::ids::CharacterId {
        self.character_id
    }

    pub fn gauges(&self) -> &BTreeMap<ResourceKind, ResourceGauge> {
        &self.gauges
    }

    pub fn current(&self, kind: ResourceKind) -> u32 {
        self.gauges.get(&kind).map(|g| g.current).unwrap_or(0)
    }

    /// Every shortfall that would prevent paying `cost`. Empty means affordable.
    pub fn shortfalls(&self, cost: &ResourceCost) -> Vec<ResourceShortfall> {
        cost.amounts()
            .iter()
            .filter_map(|(kind, required)| {
                let available = self.current(*kind);
                (available < *required).then_some(ResourceShortfall {
                    kind: *kind,
                    required: *required,
                    available,
                })
            })
            .collect()
    }

    pub fn can_afford(&self, cost: &ResourceCost) -> bool {
        self.shortfalls(cost).is_empty()
    }

    /// Debit `cost` from the pool, all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns the full shortfall list and leaves the pool untouched when any
    /// single kind cannot be covered.
    pub fn try_debit(&mut self, cost: &ResourceCost) -> Result<(), Vec<ResourceShortfall>> {
        let shortfalls = self.shortfalls(cost);
        if !shortfalls.is_empty() {
            return Err(shortfalls);
        }
        for (kind, amount) in cost.amounts() {
            if let Some(gauge) = self.gauges.get_mut(kind) {
                gauge.current -= amount;
            }
        }
        Ok(())
    }

    /// Credit `amount` of `kind`, clamped at the gauge maximum.
    ///
    /// Crediting a kind the pool does not track is a no-op.
    pub fn credit(&mut self, kind: ResourceKind, amount: u32) {
        if let Some(gauge) = self.gauges.get_mut(&kind) {
            gauge.current = gauge.max.min(gauge.current.saturating_add(amount));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CharacterId;

    fn pool_with(kind: ResourceKind, current: u32, max: u32) -> ResourcePool {
        let gauge = ResourceGauge::new(current, max).expect("valid gauge");
        ResourcePool::new(CharacterId::new(), BTreeMap::from([(kind, gauge)]))
    }

    #[test]
    fn cost_rejects_empty_and_zero_amounts() {
        assert!(ResourceCost::new(BTreeMap::new()).is_err());
        assert!(ResourceCost::new(BTreeMap::from([(ResourceKind::Mana, 0)])).is_err());
        assert!(ResourceCost::of(ResourceKind::Mana, 10).is_ok());
    }

    #[test]
    fn debit_is_all_or_nothing() {
        let mut pool = pool_with(ResourceKind::Stamina, 20, 100);
        let cost = ResourceCost::new(BTreeMap::from([
            (ResourceKind::Stamina, 10),
            (ResourceKind::Mana, 5),
        ]))
        .expect("valid cost");

        let err = pool.try_debit(&cost).expect_err("mana is not available");
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].kind, ResourceKind::Mana);
        assert_eq!(err[0].missing(), 5);
        // Stamina untouched despite being affordable on its own
        assert_eq!(pool.current(ResourceKind::Stamina), 20);
    }

    #[test]
    fn debit_succeeds_when_affordable() {
        let mut pool = pool_with(ResourceKind::Stamina, 100, 100);
        let cost = ResourceCost::of(ResourceKind::Stamina, 30).expect("valid cost");
        pool.try_debit(&cost).expect("affordable");
        assert_eq!(pool.current(ResourceKind::Stamina), 70);
    }

    #[test]
    fn credit_clamps_at_max() {
        let mut pool = pool_with(ResourceKind::Mana, 90, 100);
        pool.credit(ResourceKind::Mana, 50);
        assert_eq!(pool.current(ResourceKind::Mana), 100);
    }

    #[test]
    fn gauge_rejects_current_above_max() {
        assert!(ResourceGauge::new(101, 100).is_err());
    }

    #[test]
    fn resource_kind_round_trips_through_str() {
        for kind in [
            ResourceKind::Stamina,
            ResourceKind::Mana,
            ResourceKind::Focus,
        ] {
            assert_eq!(kind.as_str().parse::<ResourceKind>(), Ok(kind));
        }
        assert!("blood".parse::<ResourceKind>().is_err());
    }
}
