//! Ports onto collaborating services outside this engine.

use async_trait::async_trait;
use runefall_domain::{AbilityId, CharacterId};

use super::error::RepoError;

/// Progression service boundary: which abilities a character has unlocked.
///
/// The engine trusts the answer; unlock rules (levels, quests, purchases)
/// live entirely on the other side of this port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnlockPort: Send + Sync {
    async fn is_ability_unlocked(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<bool, RepoError>;
}
