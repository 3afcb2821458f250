//! Update loadout use case.

use std::collections::BTreeMap;
use std::sync::Arc;

use runefall_domain::{AbilityId, CharacterId, Loadout, SlotKey};

use crate::entities::{LoadoutError, LoadoutManager};

pub struct UpdateLoadout {
    loadouts: Arc<LoadoutManager>,
}

impl UpdateLoadout {
    pub fn new(loadouts: Arc<LoadoutManager>) -> Self {
        Self { loadouts }
    }

    /// Execute the update loadout use case.
    ///
    /// # Returns
    /// * `Ok(Loadout)` - The merged, persisted loadout
    /// * `Err(LoadoutError::InvalidAbility)` - One slot failed validation;
    ///   nothing was changed
    pub async fn execute(
        &self,
        character_id: CharacterId,
        assignments: BTreeMap<SlotKey, Option<AbilityId>>,
    ) -> Result<Loadout, LoadoutError> {
        self.loadouts.update(character_id, assignments).await
    }
}
