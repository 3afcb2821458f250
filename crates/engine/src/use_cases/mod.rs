//! Use cases: one struct per exposed operation, wired with shared components.

pub mod abilities;
pub mod loadout;
