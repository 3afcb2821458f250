//! Per-character mutual exclusion.
//!
//! Every resolution for a character runs under that character's lock, so two
//! simultaneous requests serialize and the loser sees the winner's cooldown
//! and balance. Different characters never contend.

use std::sync::Arc;

use dashmap::DashMap;
use runefall_domain::CharacterId;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct CharacterLocks {
    locks: DashMap<CharacterId, Arc<Mutex<()>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one character, waiting behind any in-flight
    /// resolution. The guard is owned so it can travel into a spawned task.
    pub async fn acquire(&self, character_id: CharacterId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(character_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn same_character_serializes() {
        let locks = Arc::new(CharacterLocks::new());
        let character_id = CharacterId::new();
        let in_section = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_section = in_section.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(character_id).await;
                let concurrent = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(concurrent, 0);
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.expect("task completes");
        }
    }

    #[tokio::test]
    async fn different_characters_do_not_contend() {
        let locks = CharacterLocks::new();
        let first = locks.acquire(CharacterId::new()).await;
        // A second character's lock must be immediately available
        let _second = locks.acquire(CharacterId::new()).await;
        drop(first);
    }
}
