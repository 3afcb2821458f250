//! Recent ability-use history, kept for synergy evaluation.
//!
//! Each character keeps a short window of past uses. Entries older than the
//! longest synergy window in the catalog can never activate a rule, so they
//! are pruned on every write.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use runefall_domain::{AbilityId, CharacterId};

/// One completed ability use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentUse {
    pub ability_id: AbilityId,
    pub tags: BTreeSet<String>,
    pub used_at: DateTime<Utc>,
}

pub struct RecentUseStore {
    entries: DashMap<CharacterId, Vec<RecentUse>>,
    retention: Duration,
}

impl RecentUseStore {
    /// `retention` should be the longest synergy window in the catalog.
    pub fn new(retention: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            retention,
        }
    }

    /// Record a use and drop entries that have aged out of every window.
    pub fn record(&self, character_id: CharacterId, use_record: RecentUse) {
        let cutoff = use_record.used_at - self.retention;
        let mut history = self.entries.entry(character_id).or_default();
        history.retain(|entry| entry.used_at >= cutoff);
        history.push(use_record);
    }

    /// Drop a recorded use again, identified by ability and timestamp. Used
    /// when a timed-out commit is unwound.
    pub(crate) fn forget(
        &self,
        character_id: CharacterId,
        ability_id: &AbilityId,
        used_at: DateTime<Utc>,
    ) {
        if let Some(mut history) = self.entries.get_mut(&character_id) {
            history.retain(|entry| !(entry.ability_id == *ability_id && entry.used_at == used_at));
        }
    }

    /// Uses within `window` of `now`, oldest first.
    pub fn within_window(
        &self,
        character_id: CharacterId,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Vec<RecentUse> {
        let cutoff = now - window;
        self.entries
            .get(&character_id)
            .map(|history| {
                history
                    .iter()
                    .filter(|entry| entry.used_at >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn use_at(id: &str, tag: &str, at: DateTime<Utc>) -> RecentUse {
        RecentUse {
            ability_id: AbilityId::new(id).expect("valid id"),
            tags: BTreeSet::from([tag.to_string()]),
            used_at: at,
        }
    }

    #[test]
    fn prunes_entries_past_retention() {
        let store = RecentUseStore::new(Duration::seconds(10));
        let character_id = CharacterId::new();
        let t0 = Utc::now();

        store.record(character_id, use_at("dash", "mobility", t0));
        store.record(
            character_id,
            use_at("fireball", "fire", t0 + Duration::seconds(15)),
        );

        let visible = store.within_window(
            character_id,
            t0 + Duration::seconds(15),
            Duration::seconds(60),
        );
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].ability_id.as_str(), "fireball");
    }

    #[test]
    fn window_filter_excludes_older_uses() {
        let store = RecentUseStore::new(Duration::seconds(60));
        let character_id = CharacterId::new();
        let t0 = Utc::now();

        store.record(character_id, use_at("dash", "mobility", t0));
        store.record(
            character_id,
            use_at("fireball", "fire", t0 + Duration::seconds(8)),
        );

        let visible =
            store.within_window(character_id, t0 + Duration::seconds(10), Duration::seconds(5));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].ability_id.as_str(), "fireball");
    }

    #[test]
    fn forget_drops_only_the_matching_entry() {
        let store = RecentUseStore::new(Duration::seconds(60));
        let character_id = CharacterId::new();
        let t0 = Utc::now();

        store.record(character_id, use_at("dash", "mobility", t0));
        store.record(
            character_id,
            use_at("fireball", "fire", t0 + Duration::seconds(1)),
        );

        store.forget(character_id, &AbilityId::new("dash").expect("valid id"), t0);

        let visible = store.within_window(
            character_id,
            t0 + Duration::seconds(1),
            Duration::seconds(60),
        );
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].ability_id.as_str(), "fireball");
    }

    #[test]
    fn unknown_character_has_no_history() {
        let store = RecentUseStore::new(Duration::seconds(10));
        assert!(store
            .within_window(CharacterId::new(), Utc::now(), Duration::seconds(10))
            .is_empty());
    }
}
