//! Engine configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::use_cases::abilities::SynergyComposition;

/// Tunables the engine reads at startup. Unset variables fall back to the
/// defaults below; a malformed value falls back too, with a warning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether an ability must be slotted in the loadout to be used.
    pub require_equipped: bool,
    /// How modifiers from multiple active synergy rules combine.
    pub synergy_composition: SynergyComposition,
    /// Upper bound on one commit against the store.
    pub commit_timeout: Duration,
    /// Optimistic-concurrency retries before giving up with a conflict.
    pub storage_retry_max: u32,
    /// Path to the ability catalog JSON file.
    pub catalog_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_equipped: true,
            synergy_composition: SynergyComposition::Additive,
            commit_timeout: Duration::from_millis(2000),
            storage_retry_max: 3,
            catalog_path: PathBuf::from("data/catalog.json"),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            require_equipped: parse_env("REQUIRE_EQUIPPED", defaults.require_equipped),
            synergy_composition: parse_env(
                "SYNERGY_COMPOSITION",
                defaults.synergy_composition,
            ),
            commit_timeout: Duration::from_millis(parse_env(
                "COMMIT_TIMEOUT_MS",
                defaults.commit_timeout.as_millis() as u64,
            )),
            storage_retry_max: parse_env("STORAGE_RETRY_MAX", defaults.storage_retry_max),
            catalog_path: std::env::var("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(name, value = %raw, "Unparseable env var, using default");
                default
            }
        },
        Err(_) => default,
    }
}
