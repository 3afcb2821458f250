//! Loadout management.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use runefall_domain::{AbilityId, CharacterId, Loadout, SlotKey};
use tracing::info;

use crate::catalog::AbilityCatalog;
use crate::infrastructure::ports::{LoadoutRepo, RepoError, UnlockPort};

/// Why a slot assignment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidAbilityReason {
    UnknownAbility,
    NotUnlocked,
}

impl fmt::Display for InvalidAbilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAbility => write!(f, "ability does not exist"),
            Self::NotUnlocked => write!(f, "ability is not unlocked"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadoutError {
    #[error("Invalid ability '{ability_id}' in slot {slot}: {reason}")]
    InvalidAbility {
        slot: SlotKey,
        ability_id: AbilityId,
        reason: InvalidAbilityReason,
    },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Per-character slot assignments, validated against the catalog and the
/// progression service. Updates are all-or-nothing; one bad slot rejects the
/// whole request and leaves the stored loadout untouched.
pub struct LoadoutManager {
    catalog: Arc<AbilityCatalog>,
    loadouts: Arc<dyn LoadoutRepo>,
    unlocks: Arc<dyn UnlockPort>,
}

impl LoadoutManager {
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        loadouts: Arc<dyn LoadoutRepo>,
        unlocks: Arc<dyn UnlockPort>,
    ) -> Self {
        Self {
            catalog,
            loadouts,
            unlocks,
        }
    }

    /// The character's loadout, default-empty if they have never set one.
    pub async fn get(&self, character_id: CharacterId) -> Result<Loadout, RepoError> {
        Ok(self
            .loadouts
            .get(character_id)
            .await?
            .unwrap_or_else(|| Loadout::empty(character_id)))
    }

    /// Apply slot assignments. Every assigned ability is validated first;
    /// nothing is persisted unless all slots pass.
    pub async fn update(
        &self,
        character_id: CharacterId,
        assignments: BTreeMap<SlotKey, Option<AbilityId>>,
    ) -> Result<Loadout, LoadoutError> {
        for (slot, ability_id) in &assignments {
            let Some(ability_id) = ability_id else {
                continue;
            };
            if !self.catalog.contains(ability_id) {
                return Err(LoadoutError::InvalidAbility {
                    slot: *slot,
                    ability_id: ability_id.clone(),
                    reason: InvalidAbilityReason::UnknownAbility,
                });
            }
            if !self
                .unlocks
                .is_ability_unlocked(character_id, ability_id)
                .await?
            {
                return Err(LoadoutError::InvalidAbility {
                    slot: *slot,
                    ability_id: ability_id.clone(),
                    reason: InvalidAbilityReason::NotUnlocked,
                });
            }
        }

        let updated = self.get(character_id).await?.with_assignments(assignments);
        self.loadouts.save(&updated).await?;
        info!(character_id = %character_id, "Loadout updated");
        Ok(updated)
    }

    pub async fn is_equipped(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<bool, RepoError> {
        Ok(self.get(character_id).await?.contains(ability_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockLoadoutRepo, MockUnlockPort};
    use chrono::Duration;
    use runefall_domain::{
        AbilityDefinition, AbilityName, EffectDescriptor, EffectKind, ResourceCost, ResourceKind,
    };
    use std::collections::BTreeSet;

    fn catalog_with(ids: &[&str]) -> Arc<AbilityCatalog> {
        let abilities = ids
            .iter()
            .map(|id| {
                AbilityDefinition::new(
                    AbilityId::new(*id).expect("valid id"),
                    AbilityName::new("Test").expect("valid name"),
                    ResourceCost::of(ResourceKind::Stamina, 10).expect("valid cost"),
                    Duration::seconds(1),
                    EffectDescriptor::new(EffectKind::Damage, 5.0).expect("valid effect"),
                    BTreeSet::new(),
                )
                .expect("valid definition")
            })
            .collect();
        Arc::new(AbilityCatalog::from_parts(abilities, vec![]).expect("valid catalog"))
    }

    #[tokio::test]
    async fn when_character_has_no_loadout_returns_empty_default() {
        let mut loadouts = MockLoadoutRepo::new();
        loadouts.expect_get().returning(|_| Ok(None));
        let manager = LoadoutManager::new(
            catalog_with(&["dash"]),
            Arc::new(loadouts),
            Arc::new(MockUnlockPort::new()),
        );

        let loadout = manager.get(CharacterId::new()).await.expect("get");
        assert!(loadout.equipped().next().is_none());
    }

    #[tokio::test]
    async fn when_ability_is_unknown_update_is_rejected_without_saving() {
        let mut loadouts = MockLoadoutRepo::new();
        loadouts.expect_save().never();
        let manager = LoadoutManager::new(
            catalog_with(&["dash"]),
            Arc::new(loadouts),
            Arc::new(MockUnlockPort::new()),
        );

        let missing = AbilityId::new("meteor").expect("valid id");
        let result = manager
            .update(
                CharacterId::new(),
                BTreeMap::from([(SlotKey::Q, Some(missing))]),
            )
            .await;
        assert!(matches!(
            result,
            Err(LoadoutError::InvalidAbility {
                slot: SlotKey::Q,
                reason: InvalidAbilityReason::UnknownAbility,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn when_one_slot_is_locked_whole_update_is_rejected() {
        let mut loadouts = MockLoadoutRepo::new();
        loadouts.expect_save().never();
        let mut unlocks = MockUnlockPort::new();
        unlocks
            .expect_is_ability_unlocked()
            .returning(|_, ability_id| Ok(ability_id.as_str() == "dash"));
        let manager = LoadoutManager::new(
            catalog_with(&["dash", "meteor"]),
            Arc::new(loadouts),
            Arc::new(unlocks),
        );

        let result = manager
            .update(
                CharacterId::new(),
                BTreeMap::from([
                    (SlotKey::Q, Some(AbilityId::new("dash").expect("valid id"))),
                    (
                        SlotKey::E,
                        Some(AbilityId::new("meteor").expect("valid id")),
                    ),
                ]),
            )
            .await;
        assert!(matches!(
            result,
            Err(LoadoutError::InvalidAbility {
                slot: SlotKey::E,
                reason: InvalidAbilityReason::NotUnlocked,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn when_all_slots_are_valid_update_persists_merged_loadout() {
        let character_id = CharacterId::new();
        let dash = AbilityId::new("dash").expect("valid id");

        let mut loadouts = MockLoadoutRepo::new();
        loadouts.expect_get().returning(|_| Ok(None));
        let expected = dash.clone();
        loadouts
            .expect_save()
            .withf(move |loadout| loadout.slot(SlotKey::Q) == Some(&expected))
            .returning(|_| Ok(()));
        let mut unlocks = MockUnlockPort::new();
        unlocks
            .expect_is_ability_unlocked()
            .returning(|_, _| Ok(true));
        let manager =
            LoadoutManager::new(catalog_with(&["dash"]), Arc::new(loadouts), Arc::new(unlocks));

        let updated = manager
            .update(
                character_id,
                BTreeMap::from([(SlotKey::Q, Some(dash.clone()))]),
            )
            .await
            .expect("update");
        assert!(updated.contains(&dash));
        assert_eq!(updated.slot(SlotKey::E), None);
    }
}
