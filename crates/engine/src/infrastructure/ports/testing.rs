//! Testability ports for injecting time.

use chrono::{DateTime, Utc};

/// Clock abstraction so cooldown and synergy logic never reads wall-clock
/// time directly.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
