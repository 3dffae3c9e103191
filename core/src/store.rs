//! Collaborator contracts for persistence.
//!
//! The engine never talks to a database directly. Stores receive and return
//! plain records; each backend decides how to make the documented operations
//! atomic. Methods take `&self` so a backend can be shared between request
//! handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ConfigId, Configuration, ConfigurationDraft, ConfigurationError, Identity, Round, RoundId,
    Score, UserId, Username,
};

/// Failures reported by store implementations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist or is not visible to the caller.
    #[error("{0} not found")]
    NotFound(String),
    /// The caller may not modify the record.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// A record with the same key already exists.
    #[error("{0} already exists")]
    Duplicate(String),
    /// The submitted configuration violates the layout invariants.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
    /// A conditional write lost a race with a concurrent writer. Retryable.
    #[error("concurrent write conflict")]
    ConcurrentWriteConflict,
}

impl StoreError {
    /// Whether repeating the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, StoreError::ConcurrentWriteConflict)
    }
}

/// Result of a conditional best-score write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The submitted score replaced the previous best (or was the first).
    Stored(Score),
    /// The existing best has at most as many moves; nothing was written.
    NotImproved {
        /// Move count of the preserved best score.
        current_best: u32,
    },
}

/// Storage for board configurations.
///
/// Baseline configurations are visible to everybody. Other configurations
/// are visible only to their author until a round derived from them has
/// been solved.
pub trait ConfigurationStore {
    /// Fetches a configuration visible to `viewer`.
    fn get(&self, config_id: &ConfigId, viewer: &UserId) -> Result<Configuration, StoreError>;

    /// Lists the configurations authored by `owner_id`.
    fn list(&self, owner_id: &UserId) -> Result<Vec<Configuration>, StoreError>;

    /// Lists the baseline configurations.
    fn list_baseline(&self) -> Result<Vec<Configuration>, StoreError>;

    /// Validates and stores a new configuration, assigning its id.
    fn create(
        &self,
        draft: ConfigurationDraft,
        owner_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Configuration, StoreError>;

    /// Replaces the layout of a configuration owned by `owner_id`. The
    /// creation time is kept and the update time set to `at`.
    fn update(
        &self,
        config_id: &ConfigId,
        draft: ConfigurationDraft,
        owner_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<Configuration, StoreError>;

    /// Deletes a configuration owned by `owner_id`. Rounds already generated
    /// from it are kept.
    fn delete(&self, config_id: &ConfigId, owner_id: &UserId) -> Result<(), StoreError>;
}

/// Storage for solved rounds.
pub trait RoundStore {
    /// Persists a round. Fails with [`StoreError::Duplicate`] when the id is taken.
    fn create(&self, round: Round) -> Result<(), StoreError>;

    /// Fetches a round by id.
    fn get(&self, round_id: &RoundId) -> Result<Option<Round>, StoreError>;

    /// Lists every solved round.
    fn list_solved(&self) -> Result<Vec<Round>, StoreError>;

    /// Lists rounds generated from the provided configuration.
    fn list_for_config(&self, config_id: &ConfigId) -> Result<Vec<Round>, StoreError>;

    /// Records the first solve of a round. Returns `false` when the round was
    /// already solved; the original record is kept.
    fn mark_solved(
        &self,
        round_id: &RoundId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Deletes a round authored by `user_id`. Scores recorded on it are kept.
    fn delete(&self, round_id: &RoundId, user_id: &UserId) -> Result<(), StoreError>;
}

/// Storage for best scores, one per `(round, user)` pair.
pub trait ScoreStore {
    /// Atomically stores `score` when it has strictly fewer moves than the
    /// current best for its round and user.
    fn upsert_if_better(&self, score: Score) -> Result<UpsertOutcome, StoreError>;

    /// Current best score of a user on a round.
    fn best_for(&self, round_id: &RoundId, user_id: &UserId)
        -> Result<Option<Score>, StoreError>;

    /// Every best score recorded on a round.
    fn list_for_round(&self, round_id: &RoundId) -> Result<Vec<Score>, StoreError>;

    /// Every best score recorded by a user.
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Score>, StoreError>;
}

/// Public profile attached to a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identity attributes, including the chosen username.
    #[serde(flatten)]
    pub identity: Identity,
    /// When the profile was first stored.
    pub created_at: DateTime<Utc>,
    /// When the profile was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Storage for user profiles.
pub trait ProfileStore {
    /// Fetches a stored profile.
    fn get(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Creates or updates the profile of `identity`, setting its username.
    fn set_username(
        &self,
        identity: &Identity,
        username: Username,
        at: DateTime<Utc>,
    ) -> Result<Profile, StoreError>;
}
