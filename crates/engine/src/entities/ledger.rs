//! Resource pool accounting.

use std::sync::Arc;

use runefall_domain::{CharacterId, ResourceCost, ResourceKind, ResourcePool, ResourceShortfall};
use tracing::warn;

use crate::infrastructure::ports::{RepoError, ResourcePoolRepo};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient resources")]
    Insufficient(Vec<ResourceShortfall>),

    #[error("Resource pool write conflict for character {0}")]
    Conflict(CharacterId),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Per-character resource pools with optimistic-concurrency writes.
///
/// Every mutation is a read-modify-write against the pool's version. A
/// conflicting write from elsewhere (regeneration, another node) triggers a
/// re-read and re-check; affordability is always judged against the balance
/// actually written, never a stale snapshot.
pub struct ResourceLedger {
    pools: Arc<dyn ResourcePoolRepo>,
    retry_max: u32,
}

impl ResourceLedger {
    pub fn new(pools: Arc<dyn ResourcePoolRepo>, retry_max: u32) -> Self {
        Self { pools, retry_max }
    }

    pub async fn balance(&self, character_id: CharacterId) -> Result<ResourcePool, LedgerError> {
        let versioned = self
            .pools
            .get(character_id)
            .await?
            .ok_or_else(|| RepoError::not_found("ResourcePool", character_id))?;
        Ok(versioned.value)
    }

    pub async fn can_afford(
        &self,
        character_id: CharacterId,
        cost: &ResourceCost,
    ) -> Result<bool, LedgerError> {
        Ok(self.balance(character_id).await?.can_afford(cost))
    }

    /// Debit `cost` atomically. No resource is touched unless every kind in
    /// the cost is covered.
    pub async fn debit(
        &self,
        character_id: CharacterId,
        cost: &ResourceCost,
    ) -> Result<ResourcePool, LedgerError> {
        self.mutate(character_id, |pool| {
            pool.try_debit(cost).map_err(LedgerError::Insufficient)
        })
        .await
    }

    /// Credit one resource kind, clamped at the pool maximum.
    pub async fn credit(
        &self,
        character_id: CharacterId,
        kind: ResourceKind,
        amount: u32,
    ) -> Result<ResourcePool, LedgerError> {
        self.mutate(character_id, |pool| {
            pool.credit(kind, amount);
            Ok(())
        })
        .await
    }

    /// Return a previously debited cost to the pool. Used when a commit has
    /// to be unwound after the debit already landed.
    pub(crate) async fn refund(
        &self,
        character_id: CharacterId,
        cost: &ResourceCost,
    ) -> Result<ResourcePool, LedgerError> {
        self.mutate(character_id, |pool| {
            for (kind, amount) in cost.amounts() {
                pool.credit(*kind, *amount);
            }
            Ok(())
        })
        .await
    }

    async fn mutate(
        &self,
        character_id: CharacterId,
        apply: impl Fn(&mut ResourcePool) -> Result<(), LedgerError>,
    ) -> Result<ResourcePool, LedgerError> {
        for attempt in 0..=self.retry_max {
            let versioned = self
                .pools
                .get(character_id)
                .await?
                .ok_or_else(|| RepoError::not_found("ResourcePool", character_id))?;

            let mut pool = versioned.value;
            apply(&mut pool)?;

            match self.pools.save(&pool, Some(versioned.version)).await {
                Ok(_) => return Ok(pool),
                Err(err) if err.is_conflict() => {
                    warn!(
                        character_id = %character_id,
                        attempt,
                        "Resource pool version conflict, retrying"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(LedgerError::Conflict(character_id))
    }
}
