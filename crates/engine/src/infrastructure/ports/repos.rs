//! Repository port traits for character state storage.
//!
//! Cooldowns, loadouts, and resource pools are each owned by one component
//! and persisted through the port for that entity. `ResourcePoolRepo` writes
//! are compare-and-swap on a version counter so the resolution engine can run
//! optimistic-concurrency retries against stores without transactions.

use async_trait::async_trait;
use runefall_domain::{AbilityId, CharacterId, CooldownState, Loadout, ResourcePool};

use super::error::RepoError;

/// A stored value paired with the version the store assigned to it.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CooldownRepo: Send + Sync {
    async fn get(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<Option<CooldownState>, RepoError>;

    async fn list(&self, character_id: CharacterId) -> Result<Vec<CooldownState>, RepoError>;

    async fn upsert(
        &self,
        character_id: CharacterId,
        state: &CooldownState,
    ) -> Result<(), RepoError>;

    /// Drop a stored state. Absence means ready, so this is how an unwound
    /// commit returns an ability to the never-used baseline.
    async fn remove(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadoutRepo: Send + Sync {
    async fn get(&self, character_id: CharacterId) -> Result<Option<Loadout>, RepoError>;

    /// Replaces the whole loadout in one write; slot-level updates are
    /// composed by the caller so rejection leaves the stored loadout intact.
    async fn save(&self, loadout: &Loadout) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourcePoolRepo: Send + Sync {
    async fn get(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Versioned<ResourcePool>>, RepoError>;

    /// Compare-and-swap save. `expected_version` of `None` creates the pool;
    /// otherwise the write only lands if the stored version still matches.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Conflict` when the version check fails.
    async fn save(
        &self,
        pool: &ResourcePool,
        expected_version: Option<u64>,
    ) -> Result<u64, RepoError>;
}
