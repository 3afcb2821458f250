//! Ability use cases: resolution, cooldown and synergy views, regeneration.

mod error;
mod get_cooldowns;
mod get_synergies;
mod list_abilities;
mod regenerate;
mod synergy;
mod types;
mod use_ability;

pub use error::AbilityError;
pub use get_cooldowns::GetCooldowns;
pub use get_synergies::GetSynergies;
pub use list_abilities::{AbilityListing, ListAbilities};
pub use regenerate::RegenerateResources;
pub use synergy::{SynergyComposition, SynergyEvaluator};
pub use types::{CooldownView, TargetRef, UseRequest, UseResult};
pub use use_ability::UseAbility;
