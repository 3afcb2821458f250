//! Ability use resolution.
//!
//! The orchestrator for one use-request: validate, then commit the
//! debit/cooldown pair as a single logical transaction inside the character's
//! critical section. Two concurrent requests for the same character can never
//! both commit; the loser observes the winner's cooldown or balance.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use runefall_domain::{AbilityDefinition, CharacterId};

use crate::catalog::AbilityCatalog;
use crate::entities::{CooldownTracker, LoadoutManager, ResourceLedger};
use crate::infrastructure::ports::ClockPort;
use crate::stores::{CharacterLocks, RecentUse, RecentUseStore};

use super::error::AbilityError;
use super::synergy::SynergyEvaluator;
use super::types::{TargetRef, UseRequest, UseResult};

/// Use ability use case.
///
/// Check order is equip, then cooldown, then resources; whichever gate fails
/// first names the rejection, so error precedence is stable across calls.
pub struct UseAbility {
    commit: Arc<CommitSection>,
    locks: Arc<CharacterLocks>,
    recent_uses: Arc<RecentUseStore>,
    ledger: Arc<ResourceLedger>,
    cooldowns: Arc<CooldownTracker>,
    require_equipped: bool,
    commit_timeout: StdDuration,
}

/// The state touched inside the per-character critical section. Runs on its
/// own task so a commit outlives the caller's timeout instead of being
/// cancelled halfway through its writes.
struct CommitSection {
    catalog: Arc<AbilityCatalog>,
    loadouts: Arc<LoadoutManager>,
    cooldowns: Arc<CooldownTracker>,
    ledger: Arc<ResourceLedger>,
    synergy: Arc<SynergyEvaluator>,
    recent_uses: Arc<RecentUseStore>,
    clock: Arc<dyn ClockPort>,
}

impl UseAbility {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<AbilityCatalog>,
        loadouts: Arc<LoadoutManager>,
        cooldowns: Arc<CooldownTracker>,
        ledger: Arc<ResourceLedger>,
        synergy: Arc<SynergyEvaluator>,
        recent_uses: Arc<RecentUseStore>,
        locks: Arc<CharacterLocks>,
        clock: Arc<dyn ClockPort>,
        require_equipped: bool,
        commit_timeout: StdDuration,
    ) -> Self {
        Self {
            commit: Arc::new(CommitSection {
                catalog,
                loadouts,
                cooldowns: cooldowns.clone(),
                ledger: ledger.clone(),
                synergy,
                recent_uses: recent_uses.clone(),
                clock,
            }),
            locks,
            recent_uses,
            ledger,
            cooldowns,
            require_equipped,
            commit_timeout,
        }
    }

    /// Execute the use ability use case.
    ///
    /// # Returns
    /// * `Ok(UseResult)` - The use committed; cooldown started, cost paid
    /// * `Err(AbilityError)` - Rejected with the first failing gate, or
    ///   `Timeout` when the store stalled (any landed writes are unwound)
    pub async fn execute(&self, request: UseRequest) -> Result<UseResult, AbilityError> {
        let definition = self
            .commit
            .catalog
            .lookup(&request.ability_id)
            .ok_or_else(|| AbilityError::UnknownAbility(request.ability_id.clone()))?
            .clone();

        if self.require_equipped
            && !self
                .commit
                .loadouts
                .is_equipped(request.character_id, &request.ability_id)
                .await?
        {
            return Err(AbilityError::NotEquipped(request.ability_id.clone()));
        }

        let character_id = request.character_id;
        let guard = self.locks.acquire(character_id).await;

        let commit = self.commit.clone();
        let target = request.target.clone();
        let commit_definition = definition.clone();
        let mut handle: JoinHandle<Result<UseResult, AbilityError>> = tokio::spawn(async move {
            // Guard held for the full commit so the critical section survives
            // the caller timing out
            let _guard = guard;
            commit.run(character_id, commit_definition, target).await
        });

        match tokio::time::timeout(self.commit_timeout, &mut handle).await {
            Ok(Ok(outcome)) => {
                let result = outcome?;
                info!(
                    character_id = %character_id,
                    ability_id = %result.ability_id,
                    synergies = result.applied_synergies.len(),
                    "Ability use committed"
                );
                Ok(result)
            }
            Ok(Err(join_err)) => {
                error!(character_id = %character_id, error = %join_err, "Commit task failed");
                Err(AbilityError::Repo(
                    crate::infrastructure::ports::RepoError::database("commit", join_err),
                ))
            }
            Err(_elapsed) => {
                warn!(
                    character_id = %character_id,
                    ability_id = %request.ability_id,
                    "Commit timed out, unwinding in background"
                );
                self.unwind_after_timeout(character_id, definition, handle);
                Err(AbilityError::Timeout)
            }
        }
    }

    /// The caller already saw `Timeout`; wait for the straggling commit task
    /// and reverse its writes if it landed, so the failed request leaves no
    /// state change behind.
    fn unwind_after_timeout(
        &self,
        character_id: CharacterId,
        definition: AbilityDefinition,
        handle: JoinHandle<Result<UseResult, AbilityError>>,
    ) {
        let ledger = self.ledger.clone();
        let cooldowns = self.cooldowns.clone();
        let recent_uses = self.recent_uses.clone();
        let locks = self.locks.clone();
        tokio::spawn(async move {
            let committed = match handle.await {
                Ok(Ok(result)) => result,
                _ => return,
            };
            let _guard = locks.acquire(character_id).await;
            recent_uses.forget(character_id, &committed.ability_id, committed.used_at);
            if let Err(err) = ledger.refund(character_id, definition.cost()).await {
                error!(
                    character_id = %character_id,
                    ability_id = %definition.id(),
                    error = %err,
                    "Failed to refund cost of timed-out use"
                );
            }
            if let Err(err) = cooldowns.clear(character_id, definition.id()).await {
                error!(
                    character_id = %character_id,
                    ability_id = %definition.id(),
                    error = %err,
                    "Failed to clear cooldown of timed-out use"
                );
            }
        });
    }
}

impl CommitSection {
    /// Steps inside the critical section: cooldown gate, resource gate,
    /// synergy application, cooldown start, recent-use record. All-or-nothing;
    /// a failed cooldown start refunds the debit before reporting the error.
    async fn run(
        &self,
        character_id: CharacterId,
        definition: AbilityDefinition,
        target: Option<TargetRef>,
    ) -> Result<UseResult, AbilityError> {
        let now = self.clock.now();
        let ability_id = definition.id().clone();

        let remaining = self
            .cooldowns
            .remaining(character_id, &ability_id, now)
            .await?;
        if remaining > Duration::zero() {
            return Err(AbilityError::OnCooldown { remaining });
        }

        let balance = self.ledger.debit(character_id, definition.cost()).await?;

        let loadout = self.loadouts.get(character_id).await?;
        let recent =
            self.recent_uses
                .within_window(character_id, now, self.catalog.longest_window());
        let active = self.synergy.evaluate(&loadout, &recent, now);
        let effect = self.synergy.compose(definition.effect(), &active);
        let applied_synergies = active.iter().map(|rule| rule.id().clone()).collect();

        let ready_at = match self
            .cooldowns
            .start(character_id, &ability_id, now, definition.cooldown())
            .await
        {
            Ok(ready_at) => ready_at,
            Err(err) => {
                if let Err(refund_err) = self.ledger.refund(character_id, definition.cost()).await
                {
                    error!(
                        character_id = %character_id,
                        ability_id = %ability_id,
                        error = %refund_err,
                        "Failed to refund debit after cooldown start failure"
                    );
                }
                return Err(err.into());
            }
        };

        // Recorded while the lock is still held; the next commit for this
        // character must see this use in its synergy window
        self.recent_uses.record(
            character_id,
            RecentUse {
                ability_id: ability_id.clone(),
                tags: definition.synergy_tags().clone(),
                used_at: now,
            },
        );

        Ok(UseResult {
            ability_id,
            effect,
            target,
            applied_synergies,
            used_at: now,
            ready_at,
            balance,
        })
    }
}
