//! Synergy rule evaluation.

use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use runefall_domain::{EffectDescriptor, Loadout, SynergyRule};

use crate::catalog::AbilityCatalog;
use crate::stores::RecentUse;

/// How modifiers from simultaneously-active rules combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynergyComposition {
    /// Flat bonuses sum; scale deltas sum. `1.2 x` and `1.3 x` give `1.5 x`.
    #[default]
    Additive,
    /// Flat bonuses sum; scales multiply. `1.2 x` and `1.3 x` give `1.56 x`.
    Multiplicative,
}

impl FromStr for SynergyComposition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additive" => Ok(Self::Additive),
            "multiplicative" => Ok(Self::Multiplicative),
            _ => Err(format!("Unknown synergy composition: {}", s)),
        }
    }
}

/// Determines which synergy rules are active for a character and folds their
/// modifiers into an effect.
///
/// A rule is active when every required tag is covered by an equipped ability
/// or by a use inside the rule's window. Rules are evaluated in catalog id
/// order, so identical inputs always give identical output.
pub struct SynergyEvaluator {
    catalog: Arc<AbilityCatalog>,
    composition: SynergyComposition,
}

impl SynergyEvaluator {
    pub fn new(catalog: Arc<AbilityCatalog>, composition: SynergyComposition) -> Self {
        Self {
            catalog,
            composition,
        }
    }

    /// Active rules given the character's loadout and recent-use history.
    pub fn evaluate(
        &self,
        loadout: &Loadout,
        recent_uses: &[RecentUse],
        now: DateTime<Utc>,
    ) -> Vec<&SynergyRule> {
        let equipped_tags: BTreeSet<&str> = loadout
            .equipped()
            .filter_map(|id| self.catalog.lookup(id))
            .flat_map(|def| def.synergy_tags().iter().map(String::as_str))
            .collect();

        self.catalog
            .rules()
            .filter(|rule| {
                let window_start = now - rule.window();
                rule.required_tags().iter().all(|tag| {
                    equipped_tags.contains(tag.as_str())
                        || recent_uses.iter().any(|use_record| {
                            use_record.used_at >= window_start
                                && use_record.tags.contains(tag)
                        })
                })
            })
            .collect()
    }

    /// Fold active rule modifiers into a base effect.
    pub fn compose(&self, base: EffectDescriptor, active: &[&SynergyRule]) -> EffectDescriptor {
        let flat: f64 = active
            .iter()
            .map(|rule| rule.modifier().magnitude_bonus)
            .sum();
        let scale = match self.composition {
            SynergyComposition::Additive => {
                1.0 + active
                    .iter()
                    .map(|rule| rule.modifier().magnitude_scale - 1.0)
                    .sum::<f64>()
            }
            SynergyComposition::Multiplicative => active
                .iter()
                .map(|rule| rule.modifier().magnitude_scale)
                .product(),
        };
        EffectDescriptor {
            kind: base.kind,
            magnitude: ((base.magnitude + flat) * scale).max(0.0),
        }
    }
}
