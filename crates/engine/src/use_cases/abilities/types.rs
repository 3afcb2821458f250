//! Request and result shapes for ability resolution.

use chrono::{DateTime, Utc};
use runefall_domain::{
    AbilityId, CharacterId, EffectDescriptor, ResourcePool, SynergyRuleId,
};
use serde::{Deserialize, Serialize};

/// Opaque reference to whatever the effect lands on. The engine never
/// interprets it; it flows through to the result untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetRef(pub String);

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One ability-use request. Transient; nothing here outlives the resolution
/// call.
#[derive(Debug, Clone)]
pub struct UseRequest {
    pub character_id: CharacterId,
    pub ability_id: AbilityId,
    pub target: Option<TargetRef>,
    /// Caller-supplied combat-state token, echoed for correlation.
    pub context: Option<String>,
}

/// A committed use: the final effect, what modified it, and the state the
/// commit left behind.
#[derive(Debug, Clone)]
pub struct UseResult {
    pub ability_id: AbilityId,
    pub effect: EffectDescriptor,
    pub target: Option<TargetRef>,
    pub applied_synergies: Vec<SynergyRuleId>,
    pub used_at: DateTime<Utc>,
    pub ready_at: DateTime<Utc>,
    pub balance: ResourcePool,
}

/// One cooldown entry in the character's cooldown view.
#[derive(Debug, Clone)]
pub struct CooldownView {
    pub ability_id: AbilityId,
    pub remaining: chrono::Duration,
    pub total: chrono::Duration,
    pub ready_at: DateTime<Utc>,
}
