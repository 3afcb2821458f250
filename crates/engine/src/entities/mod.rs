//! Stateful engine components, each the sole owner of its slice of
//! per-character state.

pub mod cooldowns;
pub mod ledger;
pub mod loadouts;

pub use cooldowns::CooldownTracker;
pub use ledger::{LedgerError, ResourceLedger};
pub use loadouts::{InvalidAbilityReason, LoadoutError, LoadoutManager};
