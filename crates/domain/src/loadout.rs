//! Loadouts: a character's assignment of abilities to a fixed slot set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::abilities::AbilityId;
use crate::error::DomainError;
use crate::ids::CharacterId;

/// The fixed set of active slots every character has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotKey {
    Q,
    E,
    R,
}

impl SlotKey {
    pub const ALL: [SlotKey; 3] = [SlotKey::Q, SlotKey::E, SlotKey::R];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q => "Q",
            Self::E => "E",
            Self::R => "R",
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SlotKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Q" | "q" => Ok(Self::Q),
            "E" | "e" => Ok(Self::E),
            "R" | "r" => Ok(Self::R),
            _ => Err(DomainError::parse(format!("Unknown slot key: {}", s))),
        }
    }
}

/// A character's current slot assignments.
///
/// Legality (ability exists in the catalog, ability unlocked) is checked by
/// the loadout manager before a loadout is persisted; this type only holds
/// the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    character_id: CharacterId,
    slots: BTreeMap<SlotKey, Option<AbilityId>>,
}

impl Loadout {
    /// Default loadout on first access: every slot empty.
    pub fn empty(character_id: CharacterId) -> Self {
        let slots = SlotKey::ALL.iter().map(|slot| (*slot, None)).collect();
        Self {
            character_id,
            slots,
        }
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn slots(&self) -> &BTreeMap<SlotKey, Option<AbilityId>> {
        &self.slots
    }

    pub fn slot(&self, key: SlotKey) -> Option<&AbilityId> {
        self.slots.get(&key).and_then(|s| s.as_ref())
    }

    pub fn contains(&self, ability_id: &AbilityId) -> bool {
        self.slots
            .values()
            .any(|slot| slot.as_ref() == Some(ability_id))
    }

    /// Ability ids currently slotted, in slot order.
    pub fn equipped(&self) -> impl Iterator<Item = &AbilityId> {
        self.slots.values().filter_map(|slot| slot.as_ref())
    }

    pub fn with_assignments(mut self, slots: BTreeMap<SlotKey, Option<AbilityId>>) -> Self {
        for (slot, ability) in slots {
            self.slots.insert(slot, ability);
        }
        self
    }
}
