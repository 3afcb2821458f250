//! Application state and composition.

use std::sync::Arc;

use crate::catalog::AbilityCatalog;
use crate::config::EngineConfig;
use crate::entities::{CooldownTracker, LoadoutManager, ResourceLedger};
use crate::infrastructure::ports::{
    ClockPort, CooldownRepo, LoadoutRepo, ResourcePoolRepo, UnlockPort,
};
use crate::stores::{CharacterLocks, RecentUseStore};
use crate::use_cases::abilities::{
    GetCooldowns, GetSynergies, ListAbilities, RegenerateResources, SynergyEvaluator, UseAbility,
};
use crate::use_cases::loadout::{GetLoadout, UpdateLoadout};

/// Container for the storage and collaborator ports the engine is wired with.
pub struct Repositories {
    pub cooldowns: Arc<dyn CooldownRepo>,
    pub loadouts: Arc<dyn LoadoutRepo>,
    pub pools: Arc<dyn ResourcePoolRepo>,
    pub unlocks: Arc<dyn UnlockPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub list_abilities: ListAbilities,
    pub use_ability: UseAbility,
    pub get_cooldowns: GetCooldowns,
    pub get_synergies: GetSynergies,
    pub regenerate: RegenerateResources,
    pub get_loadout: GetLoadout,
    pub update_loadout: UpdateLoadout,
}

/// Main application state, passed to HTTP handlers via Axum state.
pub struct App {
    pub catalog: Arc<AbilityCatalog>,
    pub use_cases: UseCases,
}

impl App {
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        repos: Repositories,
        clock: Arc<dyn ClockPort>,
        config: EngineConfig,
    ) -> Self {
        let loadouts = Arc::new(LoadoutManager::new(
            catalog.clone(),
            repos.loadouts,
            repos.unlocks.clone(),
        ));
        let cooldowns = Arc::new(CooldownTracker::new(repos.cooldowns));
        let ledger = Arc::new(ResourceLedger::new(repos.pools, config.storage_retry_max));
        let synergy = Arc::new(SynergyEvaluator::new(
            catalog.clone(),
            config.synergy_composition,
        ));
        let recent_uses = Arc::new(RecentUseStore::new(catalog.longest_window()));
        let locks = Arc::new(CharacterLocks::new());

        let use_cases = UseCases {
            list_abilities: ListAbilities::new(catalog.clone(), repos.unlocks),
            use_ability: UseAbility::new(
                catalog.clone(),
                loadouts.clone(),
                cooldowns.clone(),
                ledger.clone(),
                synergy.clone(),
                recent_uses.clone(),
                locks,
                clock.clone(),
                config.require_equipped,
                config.commit_timeout,
            ),
            get_cooldowns: GetCooldowns::new(catalog.clone(), cooldowns, clock.clone()),
            get_synergies: GetSynergies::new(
                catalog.clone(),
                loadouts.clone(),
                synergy,
                recent_uses,
                clock,
            ),
            regenerate: RegenerateResources::new(ledger),
            get_loadout: GetLoadout::new(loadouts.clone()),
            update_loadout: UpdateLoadout::new(loadouts),
        };

        Self { catalog, use_cases }
    }
}
