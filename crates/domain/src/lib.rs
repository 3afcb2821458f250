extern crate self as runefall_domain;

pub mod abilities;
pub mod cooldown;
pub mod error;
pub mod ids;
pub mod loadout;
pub mod resources;

pub use abilities::{
    AbilityDefinition, AbilityId, AbilityName, EffectDescriptor, EffectKind, SynergyModifier,
    SynergyRule, SynergyRuleId,
};
pub use cooldown::CooldownState;
pub use error::DomainError;
pub use ids::CharacterId;
pub use loadout::{Loadout, SlotKey};
pub use resources::{ResourceCost, ResourceGauge, ResourceKind, ResourcePool, ResourceShortfall};
