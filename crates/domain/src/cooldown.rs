//! Per-character, per-ability cooldown state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;

/// The "ready at" timestamp for one ability on one character.
///
/// Absence of a state means the ability has never been used and is ready.
/// Invariant: `ready_at` never moves backwards across successive uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownState {
    ability_id: AbilityId,
    ready_at: DateTime<Utc>,
}

impl CooldownState {
    pub fn new(ability_id: AbilityId, ready_at: DateTime<Utc>) -> Self {
        Self {
            ability_id,
            ready_at,
        }
    }

    pub fn ability_id(&self) -> &AbilityId {
        &self.ability_id
    }

    pub fn ready_at(&self) -> DateTime<Utc> {
        self.ready_at
    }

    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        now >= self.ready_at
    }

    /// Time left until ready; zero when already ready.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.ready_at - now).max(Duration::zero())
    }

    /// Move `ready_at` forward to `ready_at`.
    ///
    /// Moving the timestamp backwards is a programming error (a use was
    /// committed against a stale check); the state is left at the later of
    /// the two timestamps.
    pub fn advance(&mut self, ready_at: DateTime<Utc>) {
        debug_assert!(
            ready_at >= self.ready_at,
            "cooldown ready_at must be monotonically non-decreasing"
        );
        self.ready_at = self.ready_at.max(ready_at);
    }
}
