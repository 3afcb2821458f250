//! In-memory port adapters backed by `DashMap`.
//!
//! The process-local storage tier. A networked store would implement the same
//! ports; the versioned resource-pool writes give the engine the same
//! compare-and-swap semantics either way.

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use runefall_domain::{
    AbilityId, CharacterId, CooldownState, Loadout, ResourceGauge, ResourceKind, ResourcePool,
};

use crate::infrastructure::ports::{
    CooldownRepo, LoadoutRepo, RepoError, ResourcePoolRepo, UnlockPort, Versioned,
};

// =============================================================================
// Cooldowns
// =============================================================================

#[derive(Default)]
pub struct MemoryCooldownRepo {
    entries: DashMap<(CharacterId, AbilityId), CooldownState>,
}

impl MemoryCooldownRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CooldownRepo for MemoryCooldownRepo {
    async fn get(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<Option<CooldownState>, RepoError> {
        Ok(self
            .entries
            .get(&(character_id, ability_id.clone()))
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self, character_id: CharacterId) -> Result<Vec<CooldownState>, RepoError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().0 == character_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn upsert(
        &self,
        character_id: CharacterId,
        state: &CooldownState,
    ) -> Result<(), RepoError> {
        self.entries
            .insert((character_id, state.ability_id().clone()), state.clone());
        Ok(())
    }

    async fn remove(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<(), RepoError> {
        self.entries.remove(&(character_id, ability_id.clone()));
        Ok(())
    }
}

// =============================================================================
// Loadouts
// =============================================================================

#[derive(Default)]
pub struct MemoryLoadoutRepo {
    entries: DashMap<CharacterId, Loadout>,
}

impl MemoryLoadoutRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoadoutRepo for MemoryLoadoutRepo {
    async fn get(&self, character_id: CharacterId) -> Result<Option<Loadout>, RepoError> {
        Ok(self
            .entries
            .get(&character_id)
            .map(|entry| entry.value().clone()))
    }

    async fn save(&self, loadout: &Loadout) -> Result<(), RepoError> {
        self.entries.insert(loadout.character_id(), loadout.clone());
        Ok(())
    }
}

// =============================================================================
// Resource pools
// =============================================================================

/// Versioned in-memory pools. Characters without an explicit pool get
/// `default_gauges` on first read, so a fresh character starts at full.
pub struct MemoryResourcePoolRepo {
    entries: DashMap<CharacterId, Versioned<ResourcePool>>,
    default_gauges: BTreeMap<ResourceKind, ResourceGauge>,
}

impl MemoryResourcePoolRepo {
    pub fn new(default_gauges: BTreeMap<ResourceKind, ResourceGauge>) -> Self {
        Self {
            entries: DashMap::new(),
            default_gauges,
        }
    }

    /// Standard starting pools: 100/100 of every kind.
    pub fn with_standard_defaults() -> Self {
        let gauges = [
            ResourceKind::Stamina,
            ResourceKind::Mana,
            ResourceKind::Focus,
        ]
        .into_iter()
        .map(|kind| (kind, ResourceGauge::full(100)))
        .collect();
        Self::new(gauges)
    }
}

#[async_trait]
impl ResourcePoolRepo for MemoryResourcePoolRepo {
    async fn get(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Versioned<ResourcePool>>, RepoError> {
        if let Some(entry) = self.entries.get(&character_id) {
            return Ok(Some(entry.value().clone()));
        }
        if self.default_gauges.is_empty() {
            return Ok(None);
        }
        // First access: materialize the default pool at version 0 without
        // storing it; the first CAS write creates it.
        Ok(Some(Versioned {
            value: ResourcePool::new(character_id, self.default_gauges.clone()),
            version: 0,
        }))
    }

    async fn save(
        &self,
        pool: &ResourcePool,
        expected_version: Option<u64>,
    ) -> Result<u64, RepoError> {
        let character_id = pool.character_id();
        let mut slot = self.entries.entry(character_id).or_insert_with(|| Versioned {
            value: ResourcePool::new(character_id, self.default_gauges.clone()),
            version: 0,
        });

        let current_version = slot.value().version;
        let expected = expected_version.unwrap_or(0);
        if current_version != expected {
            return Err(RepoError::conflict("ResourcePool", character_id));
        }

        let next_version = current_version + 1;
        *slot.value_mut() = Versioned {
            value: pool.clone(),
            version: next_version,
        };
        Ok(next_version)
    }
}

// =============================================================================
// Unlocks
// =============================================================================

/// In-memory unlock registry. `permissive` treats every ability as unlocked,
/// which is the right default when no progression service is wired in.
pub struct MemoryUnlockRegistry {
    grants: DashMap<CharacterId, std::collections::BTreeSet<AbilityId>>,
    permissive: bool,
}

impl MemoryUnlockRegistry {
    pub fn permissive() -> Self {
        Self {
            grants: DashMap::new(),
            permissive: true,
        }
    }

    pub fn strict() -> Self {
        Self {
            grants: DashMap::new(),
            permissive: false,
        }
    }

    pub fn grant(&self, character_id: CharacterId, ability_id: AbilityId) {
        self.grants.entry(character_id).or_default().insert(ability_id);
    }
}

#[async_trait]
impl UnlockPort for MemoryUnlockRegistry {
    async fn is_ability_unlocked(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<bool, RepoError> {
        if self.permissive {
            return Ok(true);
        }
        Ok(self
            .grants
            .get(&character_id)
            .map(|set| set.contains(ability_id))
            .unwrap_or(false))
    }
}
