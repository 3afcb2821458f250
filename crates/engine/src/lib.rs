//! Ability resolution engine: catalog, cooldowns, loadouts, resources,
//! synergies, and the per-character commit path that ties them together.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;
