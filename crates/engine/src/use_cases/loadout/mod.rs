//! Loadout use cases.

mod get_loadout;
mod update_loadout;

pub use get_loadout::GetLoadout;
pub use update_loadout::UpdateLoadout;
