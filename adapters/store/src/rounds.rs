use chrono::{DateTime, Utc};
use log::{info, warn};
use ricochet_core::{
    store::{RoundStore, StoreError},
    ConfigId, Round, RoundId, UserId,
};

use crate::MemoryBackend;

/// [`RoundStore`] view of a [`MemoryBackend`].
#[derive(Clone, Copy, Debug)]
pub struct Rounds<'a> {
    backend: &'a MemoryBackend,
}

impl<'a> Rounds<'a> {
    pub(crate) const fn new(backend: &'a MemoryBackend) -> Self {
        Self { backend }
    }
}

impl RoundStore for Rounds<'_> {
    fn create(&self, round: Round) -> Result<(), StoreError> {
        let mut tables = self.backend.lock();
        if tables.rounds.contains_key(round.round_id()) {
            return Err(StoreError::Duplicate(format!("round {}", round.round_id())));
        }
        let _ = tables.rounds.insert(round.round_id().clone(), round);
        Ok(())
    }

    fn get(&self, round_id: &RoundId) -> Result<Option<Round>, StoreError> {
        Ok(self.backend.lock().rounds.get(round_id).cloned())
    }

    fn list_solved(&self) -> Result<Vec<Round>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .rounds
            .values()
            .filter(|round| round.is_solved())
            .cloned()
            .collect())
    }

    fn list_for_config(&self, config_id: &ConfigId) -> Result<Vec<Round>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .rounds
            .values()
            .filter(|round| round.config_id() == config_id)
            .cloned()
            .collect())
    }

    fn mark_solved(
        &self,
        round_id: &RoundId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.backend.lock();
        let round = tables
            .rounds
            .get_mut(round_id)
            .ok_or_else(|| StoreError::NotFound(format!("round {round_id}")))?;
        let first = round.mark_solved(user_id.clone(), at);
        if first {
            info!("round {round_id} first solved by {user_id}");
        }
        Ok(first)
    }

    fn delete(&self, round_id: &RoundId, user_id: &UserId) -> Result<(), StoreError> {
        let mut tables = self.backend.lock();
        let round = tables
            .rounds
            .get(round_id)
            .ok_or_else(|| StoreError::NotFound(format!("round {round_id}")))?;
        if round.author_id() != user_id {
            warn!("{user_id} may not delete round {round_id}");
            return Err(StoreError::Forbidden(format!(
                "round {round_id} belongs to another user"
            )));
        }
        let _ = tables.rounds.remove(round_id);
        info!("deleted round {round_id}");
        Ok(())
    }
}
