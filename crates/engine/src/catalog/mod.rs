//! Immutable ability reference data.
//!
//! Loaded once at startup, shared as `Arc<AbilityCatalog>` by every component.
//! Load failures are fatal; there is no request-time recovery from a corrupt
//! catalog.

mod loader;

use std::collections::BTreeMap;

use chrono::Duration;
use runefall_domain::{AbilityDefinition, AbilityId, SynergyRule, SynergyRuleId};

pub use loader::{load_catalog, parse_catalog, CatalogError};

/// The read-only catalog of ability definitions and synergy rules.
#[derive(Debug)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, AbilityDefinition>,
    rules: BTreeMap<SynergyRuleId, SynergyRule>,
    longest_window: Duration,
}

impl AbilityCatalog {
    /// Build a catalog from loaded definitions.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateAbility` / `DuplicateRule` on repeated
    /// ids - duplicates indicate a corrupt catalog file and are fatal.
    pub fn from_parts(
        abilities: Vec<AbilityDefinition>,
        rules: Vec<SynergyRule>,
    ) -> Result<Self, CatalogError> {
        let mut ability_map = BTreeMap::new();
        for ability in abilities {
            let id = ability.id().clone();
            if ability_map.insert(id.clone(), ability).is_some() {
                return Err(CatalogError::DuplicateAbility(id));
            }
        }

        let mut rule_map = BTreeMap::new();
        let mut longest_window = Duration::zero();
        for rule in rules {
            let id = rule.id().clone();
            longest_window = longest_window.max(rule.window());
            if rule_map.insert(id.clone(), rule).is_some() {
                return Err(CatalogError::DuplicateRule(id));
            }
        }

        Ok(Self {
            abilities: ability_map,
            rules: rule_map,
            longest_window,
        })
    }

    pub fn lookup(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &AbilityId) -> bool {
        self.abilities.contains_key(id)
    }

    /// All definitions, ordered by id.
    pub fn all(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    /// All synergy rules, ordered by id (the evaluation order, so results
    /// are deterministic).
    pub fn rules(&self) -> impl Iterator<Item = &SynergyRule> {
        self.rules.values()
    }

    /// The longest synergy window in the catalog; recent-use history older
    /// than this can never activate a rule.
    pub fn longest_window(&self) -> Duration {
        self.longest_window
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runefall_domain::{
        AbilityName, EffectDescriptor, EffectKind, ResourceCost, ResourceKind, SynergyModifier,
    };
    use std::collections::BTreeSet;

    fn ability(id: &str) -> AbilityDefinition {
        AbilityDefinition::new(
            AbilityId::new(id).expect("valid id"),
            AbilityName::new("Test").expect("valid name"),
            ResourceCost::of(ResourceKind::Stamina, 10).expect("valid cost"),
            Duration::seconds(3),
            EffectDescriptor::new(EffectKind::Damage, 10.0).expect("valid effect"),
            BTreeSet::new(),
        )
        .expect("valid definition")
    }

    fn rule(id: &str, window_secs: i64) -> SynergyRule {
        SynergyRule::new(
            SynergyRuleId::new(id).expect("valid id"),
            BTreeSet::from(["a".to_string(), "b".to_string()]),
            Duration::seconds(window_secs),
            SynergyModifier::default(),
        )
        .expect("valid rule")
    }

    #[test]
    fn duplicate_ability_id_is_fatal() {
        let result = AbilityCatalog::from_parts(vec![ability("dash"), ability("dash")], vec![]);
        assert!(matches!(result, Err(CatalogError::DuplicateAbility(_))));
    }

    #[test]
    fn duplicate_rule_id_is_fatal() {
        let result = AbilityCatalog::from_parts(
            vec![ability("dash")],
            vec![rule("swift", 10), rule("swift", 20)],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateRule(_))));
    }

    #[test]
    fn longest_window_spans_all_rules() {
        let catalog =
            AbilityCatalog::from_parts(vec![], vec![rule("swift", 10), rule("arcane", 45)])
                .expect("valid catalog");
        assert_eq!(catalog.longest_window(), Duration::seconds(45));
    }

    #[test]
    fn lookup_finds_loaded_abilities() {
        let catalog =
            AbilityCatalog::from_parts(vec![ability("dash")], vec![]).expect("valid catalog");
        let dash = AbilityId::new("dash").expect("valid id");
        assert!(catalog.lookup(&dash).is_some());
        assert!(!catalog.contains(&AbilityId::new("missing").expect("valid id")));
    }
}
