#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score evaluator that replays submitted solutions and records best scores.
//!
//! Validation is a pure replay through the world [`GameState`], so a
//! solution is accepted only when the same moves played interactively would
//! reach the target. Persistence goes through the [`RoundStore`] and
//! [`ScoreStore`] traits; the store is responsible for making the best-score
//! update atomic, deciding with [`Score::improves_on`].

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use ricochet_core::{
    store::{RoundStore, ScoreStore, StoreError, UpsertOutcome},
    Move, Round, Score, UserId, MAX_SCORED_MOVES,
};
use ricochet_world::GameState;
use thiserror::Error;

/// Default number of retries after a concurrent write conflict.
pub const DEFAULT_CONFLICT_RETRIES: u32 = 3;

/// How moves that leave their robot in place are treated during replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NoOpPolicy {
    /// Reject the whole solution.
    #[default]
    Reject,
    /// Accept the move and count it towards the total.
    Count,
}

/// Tuning knobs for the submission workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringSettings {
    /// Treatment of moves that do not displace their robot.
    pub no_op_moves: NoOpPolicy,
    /// Retries after [`StoreError::ConcurrentWriteConflict`] before giving up.
    pub conflict_retries: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            no_op_moves: NoOpPolicy::default(),
            conflict_retries: DEFAULT_CONFLICT_RETRIES,
        }
    }
}

/// Reasons a submitted solution is not scored.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ScoreRejection {
    /// The solution is longer than the largest recordable move count.
    #[error("solution uses {moves} moves, at most {} can be saved", MAX_SCORED_MOVES)]
    MoveLimitExceeded {
        /// Length of the submitted sequence.
        moves: usize,
    },
    /// A move left its robot in place.
    #[error("move {index} ({mv}) does not displace its robot")]
    NoOpMove {
        /// Zero-based position of the move in the sequence.
        index: usize,
        /// The offending move.
        mv: Move,
    },
    /// The target robot does not finish on the target cell.
    #[error("the target robot does not finish on the target cell")]
    NotSolved,
}

/// Failures of the submission workflow.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The solution was rejected; nothing was written.
    #[error(transparent)]
    Rejected(#[from] ScoreRejection),
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmissionError {
    /// Whether repeating the submission may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            SubmissionError::Rejected(_) => false,
            SubmissionError::Store(error) => error.is_retryable(),
        }
    }
}

/// Outcome of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The score is the user's new best.
    Recorded {
        /// The stored score.
        score: Score,
        /// Whether this submission was the first solve of the round.
        first_solve: bool,
    },
    /// The user already has a score at least as good; nothing was written.
    NotImproved {
        /// Move count of the preserved best.
        current_best: u32,
        /// Move count of the submitted solution.
        submitted: u32,
    },
}

/// Replays `moves` on the round and builds the resulting score.
///
/// The length limit is checked before anything is replayed, so over-long
/// solutions are rejected even when they are correct.
pub fn validate_and_score(
    round: &Round,
    user_id: &UserId,
    moves: &[Move],
    completed_at: DateTime<Utc>,
    policy: NoOpPolicy,
) -> Result<Score, ScoreRejection> {
    if moves.len() > MAX_SCORED_MOVES as usize {
        return Err(ScoreRejection::MoveLimitExceeded { moves: moves.len() });
    }

    let mut state = GameState::new(*round.initial_robots());
    for (index, mv) in moves.iter().enumerate() {
        let (next, outcome) = state.advance(round.board(), *mv);
        if !outcome.displaced() && policy == NoOpPolicy::Reject {
            return Err(ScoreRejection::NoOpMove { index, mv: *mv });
        }
        state = next;
    }

    if !round.is_reached_by(state.robots()) {
        return Err(ScoreRejection::NotSolved);
    }

    Ok(Score {
        round_id: round.round_id().clone(),
        user_id: user_id.clone(),
        moves: state.move_count(),
        move_sequence: moves.to_vec(),
        completed_at,
        attempt_count: 1,
    })
}

/// Validates a solution and records it as the user's best when it improves.
///
/// The stored copy of the round is authoritative when one exists; otherwise
/// `round` is persisted before its first score is written. The first stored
/// score of a round marks it solved.
pub fn submit_solution<R, S>(
    rounds: &R,
    scores: &S,
    round: &Round,
    user_id: &UserId,
    moves: &[Move],
    now: DateTime<Utc>,
    settings: &ScoringSettings,
) -> Result<SubmissionOutcome, SubmissionError>
where
    R: RoundStore + ?Sized,
    S: ScoreStore + ?Sized,
{
    let stored = rounds.get(round.round_id())?;
    let round = stored.as_ref().unwrap_or(round);

    let score = match validate_and_score(round, user_id, moves, now, settings.no_op_moves) {
        Ok(score) => score,
        Err(rejection) => {
            warn!("rejected solution for {} by {user_id}: {rejection}", round.round_id());
            return Err(rejection.into());
        }
    };

    if stored.is_none() {
        match rounds.create(round.clone()) {
            Ok(()) => info!("persisted round {}", round.round_id()),
            Err(StoreError::Duplicate(_)) => debug!("round {} stored concurrently", round.round_id()),
            Err(error) => return Err(error.into()),
        }
    }

    let submitted = score.moves;
    match upsert_with_retry(scores, score, settings.conflict_retries)? {
        UpsertOutcome::Stored(score) => {
            let first_solve = rounds.mark_solved(round.round_id(), user_id, now)?;
            info!(
                "recorded {} moves for {user_id} on {} (attempt {})",
                score.moves,
                round.round_id(),
                score.attempt_count
            );
            Ok(SubmissionOutcome::Recorded { score, first_solve })
        }
        UpsertOutcome::NotImproved { current_best } => {
            debug!("{submitted} moves by {user_id} do not beat {current_best}");
            Ok(SubmissionOutcome::NotImproved {
                current_best,
                submitted,
            })
        }
    }
}

fn upsert_with_retry<S>(
    scores: &S,
    score: Score,
    retries: u32,
) -> Result<UpsertOutcome, StoreError>
where
    S: ScoreStore + ?Sized,
{
    let mut attempt = 0;
    loop {
        match scores.upsert_if_better(score.clone()) {
            Err(error) if error.is_retryable() && attempt < retries => {
                attempt += 1;
                warn!(
                    "best-score write for {} lost a race, retry {attempt}/{retries}",
                    score.round_id
                );
            }
            result => return result,
        }
    }
}
