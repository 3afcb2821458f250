//! Active synergy projection.

use std::sync::Arc;

use runefall_domain::{CharacterId, SynergyRule};

use crate::catalog::AbilityCatalog;
use crate::entities::LoadoutManager;
use crate::infrastructure::ports::ClockPort;
use crate::stores::RecentUseStore;

use super::error::AbilityError;
use super::synergy::SynergyEvaluator;

/// Read-only view of the synergy rules currently active for a character.
/// No side effects; repeated calls with an unchanged clock give the same set.
pub struct GetSynergies {
    catalog: Arc<AbilityCatalog>,
    loadouts: Arc<LoadoutManager>,
    synergy: Arc<SynergyEvaluator>,
    recent_uses: Arc<RecentUseStore>,
    clock: Arc<dyn ClockPort>,
}

impl GetSynergies {
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        loadouts: Arc<LoadoutManager>,
        synergy: Arc<SynergyEvaluator>,
        recent_uses: Arc<RecentUseStore>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            catalog,
            loadouts,
            synergy,
            recent_uses,
            clock,
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<SynergyRule>, AbilityError> {
        let now = self.clock.now();
        let loadout = self.loadouts.get(character_id).await?;
        let recent =
            self.recent_uses
                .within_window(character_id, now, self.catalog.longest_window());
        Ok(self
            .synergy
            .evaluate(&loadout, &recent, now)
            .into_iter()
            .cloned()
            .collect())
    }
}
