//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Character state storage (could swap in-memory -> networked store)
//! - The progression/unlock service
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::RepoError;
pub use external::UnlockPort;
pub use repos::{CooldownRepo, LoadoutRepo, ResourcePoolRepo, Versioned};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockUnlockPort;
#[cfg(test)]
pub use repos::{MockCooldownRepo, MockLoadoutRepo, MockResourcePoolRepo};
#[cfg(test)]
pub use testing::MockClockPort;
