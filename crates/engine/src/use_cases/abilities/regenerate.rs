//! Resource regeneration use case.
//!
//! Called by the surrounding system's regeneration tick. Credits are clamped
//! at the pool maximum, so over-regeneration is harmless.

use std::sync::Arc;

use runefall_domain::{CharacterId, ResourceKind, ResourcePool};
use tracing::debug;

use crate::entities::{LedgerError, ResourceLedger};

pub struct RegenerateResources {
    ledger: Arc<ResourceLedger>,
}

impl RegenerateResources {
    pub fn new(ledger: Arc<ResourceLedger>) -> Self {
        Self { ledger }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        kind: ResourceKind,
        amount: u32,
    ) -> Result<ResourcePool, LedgerError> {
        let pool = self.ledger.credit(character_id, kind, amount).await?;
        debug!(
            character_id = %character_id,
            kind = %kind,
            amount,
            balance = pool.current(kind),
            "Resources regenerated"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockResourcePoolRepo, Versioned};
    use runefall_domain::ResourceGauge;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn credits_through_the_ledger() {
        let character_id = CharacterId::new();
        let mut pools = MockResourcePoolRepo::new();
        pools.expect_get().returning(move |_| {
            Ok(Some(Versioned {
                value: ResourcePool::new(
                    character_id,
                    BTreeMap::from([(
                        ResourceKind::Mana,
                        ResourceGauge::new(40, 100).expect("valid gauge"),
                    )]),
                ),
                version: 1,
            }))
        });
        pools
            .expect_save()
            .withf(|pool, _| pool.current(ResourceKind::Mana) == 65)
            .returning(|_, _| Ok(2));
        let use_case =
            RegenerateResources::new(Arc::new(ResourceLedger::new(Arc::new(pools), 2)));

        let pool = use_case
            .execute(character_id, ResourceKind::Mana, 25)
            .await
            .expect("regenerate");
        assert_eq!(pool.current(ResourceKind::Mana), 65);
    }
}
