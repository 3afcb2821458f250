//! Process-local shared state.

mod character_locks;
mod recent_uses;

pub use character_locks::CharacterLocks;
pub use recent_uses::{RecentUse, RecentUseStore};
