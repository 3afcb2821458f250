//! Catalog file loading.
//!
//! The catalog is a single JSON document authored by designers. Every entry
//! goes through the domain constructors so invariants (positive costs,
//! non-negative cooldowns, two-tag rules) hold before the catalog is shared.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Duration;
use runefall_domain::{
    AbilityDefinition, AbilityId, AbilityName, DomainError, EffectDescriptor, EffectKind,
    ResourceCost, ResourceKind, SynergyModifier, SynergyRule, SynergyRuleId,
};
use serde::Deserialize;

use super::AbilityCatalog;

/// Catalog load failures. All fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog entry '{entry}': {source}")]
    Invalid {
        entry: String,
        #[source]
        source: DomainError,
    },

    #[error("Duplicate ability id in catalog: {0}")]
    DuplicateAbility(AbilityId),

    #[error("Duplicate synergy rule id in catalog: {0}")]
    DuplicateRule(SynergyRuleId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    abilities: Vec<AbilityEntry>,
    #[serde(default)]
    synergy_rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct AbilityEntry {
    id: String,
    name: String,
    cost: BTreeMap<String, u32>,
    cooldown_ms: i64,
    effect: EffectEntry,
    #[serde(default)]
    synergy_tags: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
struct EffectEntry {
    kind: String,
    magnitude: f64,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    id: String,
    required_tags: BTreeSet<String>,
    window_ms: i64,
    #[serde(default)]
    magnitude_bonus: f64,
    #[serde(default = "default_scale")]
    magnitude_scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

/// Load and validate a catalog from a JSON file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<AbilityCatalog, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    parse_catalog(&raw)
}

/// Parse and validate a catalog from JSON text.
pub fn parse_catalog(raw: &str) -> Result<AbilityCatalog, CatalogError> {
    let file: CatalogFile = serde_json::from_str(raw)?;

    let abilities = file
        .abilities
        .into_iter()
        .map(build_ability)
        .collect::<Result<Vec<_>, _>>()?;

    let rules = file
        .synergy_rules
        .into_iter()
        .map(build_rule)
        .collect::<Result<Vec<_>, _>>()?;

    AbilityCatalog::from_parts(abilities, rules)
}

fn build_ability(entry: AbilityEntry) -> Result<AbilityDefinition, CatalogError> {
    let context = entry.id.clone();
    let invalid = |source: DomainError| CatalogError::Invalid {
        entry: context.clone(),
        source,
    };

    let id = AbilityId::new(entry.id.clone()).map_err(invalid)?;
    let name = AbilityName::new(entry.name).map_err(invalid)?;

    let mut amounts = BTreeMap::new();
    for (kind, amount) in entry.cost {
        let kind: ResourceKind = kind.parse().map_err(invalid)?;
        amounts.insert(kind, amount);
    }
    let cost = ResourceCost::new(amounts).map_err(invalid)?;

    let effect_kind = parse_effect_kind(&entry.effect.kind).map_err(invalid)?;
    let effect = EffectDescriptor::new(effect_kind, entry.effect.magnitude).map_err(invalid)?;

    AbilityDefinition::new(
        id,
        name,
        cost,
        Duration::milliseconds(entry.cooldown_ms),
        effect,
        entry.synergy_tags,
    )
    .map_err(invalid)
}

fn build_rule(entry: RuleEntry) -> Result<SynergyRule, CatalogError> {
    let context = entry.id.clone();
    let invalid = |source: DomainError| CatalogError::Invalid {
        entry: context.clone(),
        source,
    };

    let id = SynergyRuleId::new(entry.id.clone()).map_err(invalid)?;
    SynergyRule::new(
        id,
        entry.required_tags,
        Duration::milliseconds(entry.window_ms),
        SynergyModifier {
            magnitude_bonus: entry.magnitude_bonus,
            magnitude_scale: entry.magnitude_scale,
        },
    )
    .map_err(invalid)
}

fn parse_effect_kind(s: &str) -> Result<EffectKind, DomainError> {
    match s {
        "damage" => Ok(EffectKind::Damage),
        "heal" => Ok(EffectKind::Heal),
        "shield" => Ok(EffectKind::Shield),
        "haste" => Ok(EffectKind::Haste),
        _ => Err(DomainError::parse(format!("Unknown effect kind: {}", s))),
    }
}
