#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! In-memory reference backend for the Ricochet store traits.
//!
//! All tables live behind a single [`Mutex`], which makes every operation,
//! including the conditional best-score write, atomic with respect to the
//! others. Each store trait is implemented by a lightweight view borrowed
//! from [`MemoryBackend`].

mod configurations;
mod profiles;
mod rounds;
mod scores;
mod snapshot;

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use ricochet_core::{store::Profile, ConfigId, Configuration, Round, RoundId, Score, UserId};

pub use configurations::Configurations;
pub use profiles::Profiles;
pub use rounds::Rounds;
pub use scores::Scores;
pub use snapshot::Snapshot;

/// Identity whose configurations form the shared baseline set by default.
pub const DEFAULT_BASELINE_AUTHOR: &str = "baseline";

/// Settings of the in-memory backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    /// Author whose configurations are treated as baseline.
    pub baseline_author: UserId,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            baseline_author: UserId::new(DEFAULT_BASELINE_AUTHOR),
        }
    }
}

/// Thread-safe in-memory storage for configurations, rounds, scores and profiles.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    settings: StoreSettings,
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    configurations: BTreeMap<ConfigId, Configuration>,
    last_config_id: u64,
    rounds: BTreeMap<RoundId, Round>,
    scores: BTreeMap<(RoundId, UserId), Score>,
    profiles: BTreeMap<UserId, Profile>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        Self::with_tables(settings, Tables::default())
    }

    fn with_tables(settings: StoreSettings, tables: Tables) -> Self {
        Self {
            settings,
            tables: Mutex::new(tables),
        }
    }

    /// Settings the backend was created with.
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Configuration store view.
    #[must_use]
    pub fn configurations(&self) -> Configurations<'_> {
        Configurations::new(self)
    }

    /// Round store view.
    #[must_use]
    pub fn rounds(&self) -> Rounds<'_> {
        Rounds::new(self)
    }

    /// Score store view.
    #[must_use]
    pub fn scores(&self) -> Scores<'_> {
        Scores::new(self)
    }

    /// Profile store view.
    #[must_use]
    pub fn profiles(&self) -> Profiles<'_> {
        Profiles::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // Tables are only mutated after every check has passed, so a panic
        // in another thread cannot leave them half-written.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
