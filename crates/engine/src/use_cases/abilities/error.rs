//! Ability operation errors.

use chrono::Duration;
use runefall_domain::{AbilityId, ResourceShortfall};

use crate::entities::LedgerError;
use crate::infrastructure::ports::RepoError;

/// Rejections and failures a use-request can produce. All recoverable by the
/// caller; each carries enough detail to render an actionable message.
#[derive(Debug, thiserror::Error)]
pub enum AbilityError {
    #[error("Unknown ability: {0}")]
    UnknownAbility(AbilityId),

    #[error("Ability {0} is not equipped")]
    NotEquipped(AbilityId),

    #[error("Ability is on cooldown for {}ms", remaining.num_milliseconds())]
    OnCooldown { remaining: Duration },

    #[error("Insufficient resources")]
    InsufficientResources { missing: Vec<ResourceShortfall> },

    #[error("The commit did not complete in time")]
    Timeout,

    #[error("Concurrent writes kept conflicting after retries")]
    StorageConflict,

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<LedgerError> for AbilityError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Insufficient(missing) => Self::InsufficientResources { missing },
            LedgerError::Conflict(_) => Self::StorageConflict,
            LedgerError::Repo(err) => Self::Repo(err),
        }
    }
}
