//! Catalog listing use case.

use std::sync::Arc;

use runefall_domain::{AbilityDefinition, CharacterId};

use crate::catalog::AbilityCatalog;
use crate::infrastructure::ports::{RepoError, UnlockPort};

/// One catalog entry in the listing, with the unlock state when the caller
/// asked on behalf of a character.
#[derive(Debug, Clone)]
pub struct AbilityListing {
    pub definition: AbilityDefinition,
    pub unlocked: Option<bool>,
}

/// List the ability catalog, optionally annotated with which abilities a
/// character has unlocked.
pub struct ListAbilities {
    catalog: Arc<AbilityCatalog>,
    unlocks: Arc<dyn UnlockPort>,
}

impl ListAbilities {
    pub fn new(catalog: Arc<AbilityCatalog>, unlocks: Arc<dyn UnlockPort>) -> Self {
        Self { catalog, unlocks }
    }

    pub async fn execute(
        &self,
        character_id: Option<CharacterId>,
    ) -> Result<Vec<AbilityListing>, RepoError> {
        let mut listings = Vec::with_capacity(self.catalog.len());
        for definition in self.catalog.all() {
            let unlocked = match character_id {
                Some(character_id) => Some(
                    self.unlocks
                        .is_ability_unlocked(character_id, definition.id())
                        .await?,
                ),
                None => None,
            };
            listings.push(AbilityListing {
                definition: definition.clone(),
                unlocked,
            });
        }
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockUnlockPort;
    use chrono::Duration;
    use runefall_domain::{
        AbilityId, AbilityName, EffectDescriptor, EffectKind, ResourceCost, ResourceKind,
    };
    use std::collections::BTreeSet;

    fn catalog() -> Arc<AbilityCatalog> {
        let abilities = ["dash", "fireball"]
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
    async fn without_character_no_unlock_state_is_reported() {
        let mut unlocks = MockUnlockPort::new();
        unlocks.expect_is_ability_unlocked().never();
        let use_case = ListAbilities::new(catalog(), Arc::new(unlocks));

        let listings = use_case.execute(None).await.expect("list");
        assert_eq!(listings.len(), 2);
        assert!(listings.iter().all(|l| l.unlocked.is_none()));
    }

    #[tokio::test]
    async fn with_character_each_entry_carries_unlock_state() {
        let mut unlocks = MockUnlockPort::new();
        unlocks
            .expect_is_ability_unlocked()
            .returning(|_, ability_id| Ok(ability_id.as_str() == "dash"));
        let use_case = ListAbilities::new(catalog(), Arc::new(unlocks));

        let listings = use_case
            .execute(Some(CharacterId::new()))
            .await
            .expect("list");
        assert_eq!(listings[0].unlocked, Some(true)); // dash
        assert_eq!(listings[1].unlocked, Some(false)); // fireball
    }
}
