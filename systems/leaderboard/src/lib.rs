#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Leaderboard views derived from the authoritative score set.
//!
//! Nothing here is stored: per-round rankings and the global medal table are
//! recomputed from scores on every read.

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{DateTime, Utc};
use ricochet_core::{Medal, RoundId, Score, UserId};

/// A score placed within its round's ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedScore {
    /// The ranked score.
    pub score: Score,
    /// Dense 1-based tier: every distinct move count forms one tier.
    pub rank: u32,
    /// Medal awarded to the tier, if it is one of the top three.
    pub medal: Option<Medal>,
}

/// Ranks the scores of one round.
///
/// Scores are ordered by move count, then by completion time; equal move
/// counts share a tier and therefore a medal.
#[must_use]
pub fn rank_scores(scores: &[Score]) -> Vec<RankedScore> {
    let mut ordered: Vec<&Score> = scores.iter().collect();
    ordered.sort_by(|a, b| display_order(a, b));

    let mut ranked = Vec::with_capacity(ordered.len());
    let mut rank = 0;
    let mut previous_moves = None;
    for score in ordered {
        if previous_moves != Some(score.moves) {
            rank += 1;
            previous_moves = Some(score.moves);
        }
        ranked.push(RankedScore {
            score: score.clone(),
            rank,
            medal: Medal::for_tier(rank),
        });
    }
    ranked
}

fn display_order(a: &Score, b: &Score) -> Ordering {
    a.moves
        .cmp(&b.moves)
        .then(a.completed_at.cmp(&b.completed_at))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Medals collected by a user across rounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MedalCounts {
    /// Number of gold medals.
    pub gold: u32,
    /// Number of silver medals.
    pub silver: u32,
    /// Number of bronze medals.
    pub bronze: u32,
}

impl MedalCounts {
    /// Adds one medal to the tally.
    pub fn add(&mut self, medal: Medal) {
        let slot = match medal {
            Medal::Gold => &mut self.gold,
            Medal::Silver => &mut self.silver,
            Medal::Bronze => &mut self.bronze,
        };
        *slot += 1;
    }

    /// Weighted points: three per gold, two per silver, one per bronze.
    #[must_use]
    pub const fn total_points(&self) -> u32 {
        self.gold * Medal::Gold.points()
            + self.silver * Medal::Silver.points()
            + self.bronze * Medal::Bronze.points()
    }
}

/// One row of the global leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// User the row belongs to.
    pub user_id: UserId,
    /// Medals won across all rounds.
    pub medals: MedalCounts,
    /// Weighted medal points.
    pub total_points: u32,
    /// Completion time of the earliest medal-winning score, if any.
    pub first_medal_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            medals: MedalCounts::default(),
            total_points: 0,
            first_medal_at: None,
        }
    }

    fn award(&mut self, medal: Medal, at: DateTime<Utc>) {
        self.medals.add(medal);
        self.total_points = self.medals.total_points();
        self.first_medal_at = Some(self.first_medal_at.map_or(at, |first| first.min(at)));
    }
}

/// Builds the global leaderboard from every stored score.
///
/// Users are ordered by points, then by their earliest medal (users without
/// a medal come last), then by user id.
#[must_use]
pub fn global_leaderboard(scores: &[Score]) -> Vec<LeaderboardEntry> {
    let mut entries: BTreeMap<UserId, LeaderboardEntry> = BTreeMap::new();
    for ranked in by_round(scores).values().flat_map(|round| rank_scores(round)) {
        let entry = entries
            .entry(ranked.score.user_id.clone())
            .or_insert_with(|| LeaderboardEntry::new(ranked.score.user_id.clone()));
        if let Some(medal) = ranked.medal {
            entry.award(medal, ranked.score.completed_at);
        }
    }

    let mut entries: Vec<LeaderboardEntry> = entries.into_values().collect();
    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| earliest_first(a.first_medal_at, b.first_medal_at))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    entries
}

fn earliest_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_round(scores: &[Score]) -> BTreeMap<&RoundId, Vec<Score>> {
    let mut rounds: BTreeMap<&RoundId, Vec<Score>> = BTreeMap::new();
    for score in scores {
        rounds
            .entry(&score.round_id)
            .or_default()
            .push(score.clone());
    }
    rounds
}

/// A user's standing in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Round the placement refers to.
    pub round_id: RoundId,
    /// The user's best move count on the round.
    pub moves: u32,
    /// Dense tier within the round.
    pub rank: u32,
    /// Medal for the tier, if any.
    pub medal: Option<Medal>,
}

/// Medal summary of a single user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    /// User the summary belongs to.
    pub user_id: UserId,
    /// Medals won across all rounds.
    pub medals: MedalCounts,
    /// Weighted medal points.
    pub total_points: u32,
    /// Placement in every round the user has a score on, ordered by round id.
    pub placements: Vec<Placement>,
}

/// Summarizes the medals of one user.
///
/// `scores` must contain the scores of every user on the rounds of interest,
/// since a placement depends on the other competitors.
#[must_use]
pub fn user_summary(user_id: &UserId, scores: &[Score]) -> UserSummary {
    let mut medals = MedalCounts::default();
    let mut placements = Vec::new();

    for (round_id, round) in by_round(scores) {
        let Some(ranked) = rank_scores(&round)
            .into_iter()
            .find(|ranked| ranked.score.user_id == *user_id)
        else {
            continue;
        };
        if let Some(medal) = ranked.medal {
            medals.add(medal);
        }
        placements.push(Placement {
            round_id: round_id.clone(),
            moves: ranked.score.moves,
            rank: ranked.rank,
            medal: ranked.medal,
        });
    }

    UserSummary {
        user_id: user_id.clone(),
        medals,
        total_points: medals.total_points(),
        placements,
    }
}
