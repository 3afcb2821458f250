//! Storage adapters implementing the repository ports.

mod memory;

pub use memory::{
    MemoryCooldownRepo, MemoryLoadoutRepo, MemoryResourcePoolRepo, MemoryUnlockRegistry,
};
