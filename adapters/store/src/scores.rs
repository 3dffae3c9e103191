use log::debug;
use ricochet_core::{
    store::{ScoreStore, StoreError, UpsertOutcome},
    RoundId, Score, UserId,
};

use crate::MemoryBackend;

/// [`ScoreStore`] view of a [`MemoryBackend`].
#[derive(Clone, Copy, Debug)]
pub struct Scores<'a> {
    backend: &'a MemoryBackend,
}

impl<'a> Scores<'a> {
    pub(crate) const fn new(backend: &'a MemoryBackend) -> Self {
        Self { backend }
    }
}

impl ScoreStore for Scores<'_> {
    fn upsert_if_better(&self, mut score: Score) -> Result<UpsertOutcome, StoreError> {
        let mut tables = self.backend.lock();
        let key = (score.round_id.clone(), score.user_id.clone());

        if let Some(best) = tables.scores.get(&key) {
            if !score.improves_on(best) {
                debug!(
                    "kept best of {} moves for {} on {}",
                    best.moves, score.user_id, score.round_id
                );
                return Ok(UpsertOutcome::NotImproved {
                    current_best: best.moves,
                });
            }
            score.attempt_count = best.attempt_count.saturating_add(1);
        } else {
            score.attempt_count = 1;
        }

        let _ = tables.scores.insert(key, score.clone());
        Ok(UpsertOutcome::Stored(score))
    }

    fn best_for(&self, round_id: &RoundId, user_id: &UserId) -> Result<Option<Score>, StoreError> {
        let key = (round_id.clone(), user_id.clone());
        Ok(self.backend.lock().scores.get(&key).cloned())
    }

    fn list_for_round(&self, round_id: &RoundId) -> Result<Vec<Score>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .scores
            .values()
            .filter(|score| score.round_id == *round_id)
            .cloned()
            .collect())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Score>, StoreError> {
        let tables = self.backend.lock();
        Ok(tables
            .scores
            .values()
            .filter(|score| score.user_id == *user_id)
            .cloned()
            .collect())
    }
}
