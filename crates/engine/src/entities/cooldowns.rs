//! Cooldown tracking.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use runefall_domain::{AbilityId, CharacterId, CooldownState};

use crate::infrastructure::ports::{CooldownRepo, RepoError};

/// The authoritative answer to "can this ability be used now".
///
/// Reads are safe from anywhere; `start` mutates state and is restricted to
/// the resolution path, which only calls it after a successful check inside
/// the character's critical section.
pub struct CooldownTracker {
    cooldowns: Arc<dyn CooldownRepo>,
}

impl CooldownTracker {
    pub fn new(cooldowns: Arc<dyn CooldownRepo>) -> Self {
        Self { cooldowns }
    }

    /// True when no state exists or `now` has reached `ready_at`.
    pub async fn is_ready(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
        now: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        Ok(match self.cooldowns.get(character_id, ability_id).await? {
            Some(state) => state.is_ready(now),
            None => true,
        })
    }

    /// Time until ready; zero when ready or never used.
    pub async fn remaining(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
        now: DateTime<Utc>,
    ) -> Result<Duration, RepoError> {
        Ok(match self.cooldowns.get(character_id, ability_id).await? {
            Some(state) => state.remaining(now),
            None => Duration::zero(),
        })
    }

    /// All stored cooldown states for one character.
    pub async fn list(&self, character_id: CharacterId) -> Result<Vec<CooldownState>, RepoError> {
        self.cooldowns.list(character_id).await
    }

    /// Begin a cooldown after a committed use. Returns the new ready-at.
    ///
    /// Zero-duration cooldowns are never stored; the ability stays implicitly
    /// ready. Restricted to the crate so only the resolution engine, which
    /// has performed the readiness check, can start one.
    pub(crate) async fn start(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> Result<DateTime<Utc>, RepoError> {
        let ready_at = now + duration;
        if duration <= Duration::zero() {
            return Ok(ready_at);
        }

        let state = match self.cooldowns.get(character_id, ability_id).await? {
            Some(mut state) => {
                state.advance(ready_at);
                state
            }
            None => CooldownState::new(ability_id.clone(), ready_at),
        };
        let ready_at = state.ready_at();
        self.cooldowns.upsert(character_id, &state).await?;
        Ok(ready_at)
    }

    /// Unwind a cooldown started by a commit that was later abandoned.
    ///
    /// Removal is only sound when the previous state was already expired,
    /// which the readiness check guaranteed before the commit started.
    pub(crate) async fn clear(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
    ) -> Result<(), RepoError> {
        self.cooldowns.remove(character_id, ability_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCooldownRepo;

    fn dash() -> AbilityId {
        AbilityId::new("dash").expect("valid id")
    }

    #[tokio::test]
    async fn never_used_ability_is_ready() {
        let mut repo = MockCooldownRepo::new();
        repo.expect_get().returning(|_, _| Ok(None));
        let tracker = CooldownTracker::new(Arc::new(repo));
        let now = Utc::now();

        assert!(tracker
            .is_ready(CharacterId::new(), &dash(), now)
            .await
            .expect("check"));
        assert_eq!(
            tracker
                .remaining(CharacterId::new(), &dash(), now)
                .await
                .expect("check"),
            Duration::zero()
        );
    }

    #[tokio::test]
    async fn ready_boundary_is_inclusive() {
        let now = Utc::now();
        let ready_at = now + Duration::seconds(5);
        let mut repo = MockCooldownRepo::new();
        repo.expect_get()
            .returning(move |_, _| Ok(Some(CooldownState::new(dash(), ready_at))));
        let tracker = CooldownTracker::new(Arc::new(repo));
        let character_id = CharacterId::new();

        assert!(!tracker
            .is_ready(character_id, &dash(), ready_at - Duration::milliseconds(1))
            .await
            .expect("check"));
        assert!(tracker
            .is_ready(character_id, &dash(), ready_at)
            .await
            .expect("check"));
    }

    #[tokio::test]
    async fn zero_duration_cooldown_is_not_stored() {
        let mut repo = MockCooldownRepo::new();
        repo.expect_get().never();
        repo.expect_upsert().never();
        let tracker = CooldownTracker::new(Arc::new(repo));
        let now = Utc::now();

        let ready_at = tracker
            .start(CharacterId::new(), &dash(), now, Duration::zero())
            .await
            .expect("start");
        assert_eq!(ready_at, now);
    }

    #[tokio::test]
    async fn start_writes_now_plus_duration() {
        let now = Utc::now();
        let mut repo = MockCooldownRepo::new();
        repo.expect_get().returning(|_, _| Ok(None));
        let expected = now + Duration::seconds(5);
        repo.expect_upsert()
            .withf(move |_, state| state.ready_at() == expected)
            .returning(|_, _| Ok(()));
        let tracker = CooldownTracker::new(Arc::new(repo));

        let ready_at = tracker
            .start(CharacterId::new(), &dash(), now, Duration::seconds(5))
            .await
            .expect("start");
        assert_eq!(ready_at, expected);
    }
}
