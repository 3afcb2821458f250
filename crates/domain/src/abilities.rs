//! Ability catalog types: definitions, effects, and synergy rules.
//!
//! Catalog data is immutable reference data. Everything here is validated at
//! construction so a loaded catalog can be shared read-only without further
//! checks at request time.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::resources::ResourceCost;

const MAX_NAME_LENGTH: usize = 200;

// ============================================================================
// AbilityId
// ============================================================================

/// A validated catalog key for an ability.
///
/// Ability ids are human-authored (e.g. `"dash"`, `"flame_ward"`), so unlike
/// entity ids they are strings: non-empty, lowercase alphanumeric with `_`/`-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AbilityId(String);

impl AbilityId {
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the id is empty or contains
    /// characters outside `[a-z0-9_-]`.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_catalog_key("Ability id", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AbilityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AbilityId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AbilityId> for String {
    fn from(id: AbilityId) -> String {
        id.0
    }
}

/// A validated synergy rule key, same format as [`AbilityId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SynergyRuleId(String);

impl SynergyRuleId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        validate_catalog_key("Synergy rule id", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SynergyRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for SynergyRuleId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SynergyRuleId> for String {
    fn from(id: SynergyRuleId) -> String {
        id.0
    }
}

fn validate_catalog_key(what: &str, id: &str) -> Result<(), DomainError> {
    if id.is_empty() {
        return Err(DomainError::invalid_id(format!("{} cannot be empty", what)));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(DomainError::invalid_id(format!(
            "{} must be lowercase alphanumeric with '_' or '-': {}",
            what, id
        )));
    }
    Ok(())
}

// ============================================================================
// AbilityName
// ============================================================================

/// A validated display name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AbilityName(String);

impl AbilityName {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty after trimming
    /// or exceeds 200 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Ability name cannot be empty"));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Ability name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for AbilityName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<AbilityName> for String {
    fn from(name: AbilityName) -> String {
        name.0
    }
}

// ============================================================================
// Effects
// ============================================================================

/// What an ability does when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Damage,
    Heal,
    Shield,
    Haste,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Damage => "damage",
            Self::Heal => "heal",
            Self::Shield => "shield",
            Self::Haste => "haste",
        };
        write!(f, "{}", s)
    }
}

/// An effect kind with its base magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub kind: EffectKind,
    pub magnitude: f64,
}

impl EffectDescriptor {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for negative or non-finite magnitudes.
    pub fn new(kind: EffectKind, magnitude: f64) -> Result<Self, DomainError> {
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(DomainError::validation(format!(
                "Effect magnitude must be finite and non-negative, got {}",
                magnitude
            )));
        }
        Ok(Self { kind, magnitude })
    }
}

// ============================================================================
// AbilityDefinition
// ============================================================================

/// Immutable catalog entry for one ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    id: AbilityId,
    name: AbilityName,
    cost: ResourceCost,
    #[serde(with = "duration_ms")]
    cooldown: Duration,
    effect: EffectDescriptor,
    #[serde(default)]
    synergy_tags: BTreeSet<String>,
}

impl AbilityDefinition {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a negative cooldown.
    pub fn new(
        id: AbilityId,
        name: AbilityName,
        cost: ResourceCost,
        cooldown: Duration,
        effect: EffectDescriptor,
        synergy_tags: BTreeSet<String>,
    ) -> Result<Self, DomainError> {
        if cooldown < Duration::zero() {
            return Err(DomainError::validation(format!(
                "Cooldown for ability {} cannot be negative",
                id
            )));
        }
        Ok(Self {
            id,
            name,
            cost,
            cooldown,
            effect,
            synergy_tags,
        })
    }

    pub fn id(&self) -> &AbilityId {
        &self.id
    }

    pub fn name(&self) -> &AbilityName {
        &self.name
    }

    pub fn cost(&self) -> &ResourceCost {
        &self.cost
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn effect(&self) -> EffectDescriptor {
        self.effect
    }

    pub fn synergy_tags(&self) -> &BTreeSet<String> {
        &self.synergy_tags
    }
}

// ============================================================================
// SynergyRule
// ============================================================================

/// Bonus applied when a synergy rule is active.
///
/// `magnitude_bonus` adds a flat amount; `magnitude_scale` multiplies the base
/// magnitude. How bonuses from multiple active rules compose is engine
/// configuration, not catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynergyModifier {
    #[serde(default)]
    pub magnitude_bonus: f64,
    #[serde(default = "default_scale")]
    pub magnitude_scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for SynergyModifier {
    fn default() -> Self {
        Self {
            magnitude_bonus: 0.0,
            magnitude_scale: 1.0,
        }
    }
}

/// A combination rule: all required tags satisfied within the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyRule {
    id: SynergyRuleId,
    required_tags: BTreeSet<String>,
    #[serde(with = "duration_ms")]
    window: Duration,
    modifier: SynergyModifier,
}

impl SynergyRule {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if fewer than two tags are required
    /// (a single-tag "combination" is not a synergy) or the window is negative.
    pub fn new(
        id: SynergyRuleId,
        required_tags: BTreeSet<String>,
        window: Duration,
        modifier: SynergyModifier,
    ) -> Result<Self, DomainError> {
        if required_tags.len() < 2 {
            return Err(DomainError::validation(format!(
                "Synergy rule {} must require at least two tags",
                id
            )));
        }
        if window < Duration::zero() {
            return Err(DomainError::validation(format!(
                "Synergy rule {} window cannot be negative",
                id
            )));
        }
        Ok(Self {
            id,
            required_tags,
            window,
            modifier,
        })
    }

    pub fn id(&self) -> &SynergyRuleId {
        &self.id
    }

    pub fn required_tags(&self) -> &BTreeSet<String> {
        &self.required_tags
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn modifier(&self) -> SynergyModifier {
        self.modifier
    }
}

/// Serialize `chrono::Duration` as whole milliseconds (catalog wire format).
mod duration_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.num_milliseconds().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = i64::deserialize(deserializer)?;
        Ok(Duration::milliseconds(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    fn dash() -> AbilityDefinition {
        AbilityDefinition::new(
            AbilityId::new("dash").expect("valid id"),
            AbilityName::new("Dash").expect("valid name"),
            ResourceCost::of(ResourceKind::Stamina, 30).expect("valid cost"),
            Duration::seconds(5),
            EffectDescriptor::new(EffectKind::Haste, 1.5).expect("valid effect"),
            BTreeSet::from(["mobility".to_string()]),
        )
        .expect("valid definition")
    }

    #[test]
    fn ability_id_rejects_bad_keys() {
        assert!(AbilityId::new("dash").is_ok());
        assert!(AbilityId::new("flame_ward-2").is_ok());
        assert!(AbilityId::new("").is_err());
        assert!(AbilityId::new("Dash").is_err());
        assert!(AbilityId::new("fire ball").is_err());
    }

    #[test]
    fn definition_rejects_negative_cooldown() {
        let result = AbilityDefinition::new(
            AbilityId::new("dash").expect("valid id"),
            AbilityName::new("Dash").expect("valid name"),
            ResourceCost::of(ResourceKind::Stamina, 30).expect("valid cost"),
            Duration::seconds(-1),
            EffectDescriptor::new(EffectKind::Haste, 1.5).expect("valid effect"),
            BTreeSet::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn synergy_rule_requires_two_tags() {
        let single = BTreeSet::from(["mobility".to_string()]);
        let result = SynergyRule::new(
            SynergyRuleId::new("swift").expect("valid id"),
            single,
            Duration::seconds(10),
            SynergyModifier::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn definition_round_trips_through_json() {
        let def = dash();
        let json = serde_json::to_string(&def).expect("serializes");
        let back: AbilityDefinition = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, def);
        assert_eq!(back.cooldown(), Duration::seconds(5));
    }

    #[test]
    fn effect_rejects_negative_magnitude() {
        assert!(EffectDescriptor::new(EffectKind::Damage, -1.0).is_err());
        assert!(EffectDescriptor::new(EffectKind::Damage, f64::NAN).is_err());
    }
}
