//! Get loadout use case.

use std::sync::Arc;

use runefall_domain::{CharacterId, Loadout};

use crate::entities::LoadoutManager;
use crate::infrastructure::ports::RepoError;

pub struct GetLoadout {
    loadouts: Arc<LoadoutManager>,
}

impl GetLoadout {
    pub fn new(loadouts: Arc<LoadoutManager>) -> Self {
        Self { loadouts }
    }

    pub async fn execute(&self, character_id: CharacterId) -> Result<Loadout, RepoError> {
        self.loadouts.get(character_id).await
    }
}
