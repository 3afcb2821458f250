//! Cooldown view use case.

use std::sync::Arc;

use runefall_domain::CharacterId;

use crate::catalog::AbilityCatalog;
use crate::entities::CooldownTracker;
use crate::infrastructure::ports::ClockPort;

use super::error::AbilityError;
use super::types::CooldownView;

/// Read-only projection of a character's active cooldowns, with the remaining
/// and total duration for each so a client can render a progress bar without
/// another round trip.
pub struct GetCooldowns {
    catalog: Arc<AbilityCatalog>,
    cooldowns: Arc<CooldownTracker>,
    clock: Arc<dyn ClockPort>,
}

impl GetCooldowns {
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        cooldowns: Arc<CooldownTracker>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            cooldowns,
            clock,
        }
    }

    /// Execute the get cooldowns use case. Expired entries are dropped from
    /// the view; absence always means ready.
    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<CooldownView>, AbilityError> {
        let now = self.clock.now();
        let states = self.cooldowns.list(character_id).await?;
        let mut views: Vec<CooldownView> = states
            .into_iter()
            .filter(|state| !state.is_ready(now))
            .map(|state| {
                let total = self
                    .catalog
                    .lookup(state.ability_id())
                    .map(|def| def.cooldown())
                    .unwrap_or_else(|| state.remaining(now));
                CooldownView {
                    ability_id: state.ability_id().clone(),
                    remaining: state.remaining(now),
                    total,
                    ready_at: state.ready_at(),
                }
            })
            .collect();
        views.sort_by(|a, b| a.ability_id.cmp(&b.ability_id));
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockCooldownRepo;
    use chrono::{Duration, Utc};
    use runefall_domain::{
        AbilityDefinition, AbilityId, AbilityName, CooldownState, EffectDescriptor, EffectKind,
        ResourceCost, ResourceKind,
    };
    use std::collections::BTreeSet;

    fn catalog() -> Arc<AbilityCatalog> {
        let dash = AbilityDefinition::new(
            AbilityId::new("dash").expect("valid id"),
            AbilityName::new("Dash").expect("valid name"),
            ResourceCost::of(ResourceKind::Stamina, 30).expect("valid cost"),
            Duration::seconds(5),
            EffectDescriptor::new(EffectKind::Haste, 1.5).expect("valid effect"),
            BTreeSet::new(),
        )
        .expect("valid definition");
        Arc::new(AbilityCatalog::from_parts(vec![dash], vec![]).expect("valid catalog"))
    }

    #[tokio::test]
    async fn expired_entries_are_dropped_from_the_view() {
        let now = Utc::now();
        let mut repo = MockCooldownRepo::new();
        repo.expect_list().returning(move |_| {
            Ok(vec![
                CooldownState::new(
                    AbilityId::new("dash").expect("valid id"),
                    now + Duration::seconds(3),
                ),
                CooldownState::new(
                    AbilityId::new("expired").expect("valid id"),
                    now - Duration::seconds(1),
                ),
            ])
        });
        let use_case = GetCooldowns::new(
            catalog(),
            Arc::new(CooldownTracker::new(Arc::new(repo))),
            Arc::new(FixedClock(now)),
        );

        let views = use_case.execute(CharacterId::new()).await.expect("view");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].ability_id.as_str(), "dash");
        assert_eq!(views[0].remaining, Duration::seconds(3));
        assert_eq!(views[0].total, Duration::seconds(5));
    }
}
