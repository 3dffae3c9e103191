use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Board, Cell, ConfigId, RobotColor, Robots, RoundId, UserId, Wall};

/// Reasons a board configuration is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The configuration lists no candidate target cell.
    #[error("configuration must contain at least one target")]
    NoTargets,
    /// A target lies inside the walled-off center block.
    #[error("target {0} lies inside the center block")]
    TargetInCenter(Cell),
}

/// Wall and target layout submitted by a user, before it is assigned an id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDraft {
    /// Custom walls placed by the author.
    #[serde(default)]
    pub walls: BTreeSet<Wall>,
    /// Candidate target cells.
    #[serde(default)]
    pub targets: BTreeSet<Cell>,
}

impl ConfigurationDraft {
    /// Creates a draft from walls and targets.
    #[must_use]
    pub fn new<W, T>(walls: W, targets: T) -> Self
    where
        W: IntoIterator<Item = Wall>,
        T: IntoIterator<Item = Cell>,
    {
        Self {
            walls: walls.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// Checks the layout invariants shared by drafts and stored configurations.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_targets(&self.targets)
    }
}

/// Reusable wall/target layout authored by a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConfigurationRecord")]
pub struct Configuration {
    config_id: ConfigId,
    author_id: UserId,
    walls: BTreeSet<Wall>,
    targets: BTreeSet<Cell>,
    is_baseline: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Configuration {
    /// Creates a configuration after validating its layout.
    pub fn new(
        config_id: ConfigId,
        author_id: UserId,
        draft: ConfigurationDraft,
        is_baseline: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ConfigurationError> {
        draft.validate()?;
        Ok(Self {
            config_id,
            author_id,
            walls: draft.walls,
            targets: draft.targets,
            is_baseline,
            created_at,
            updated_at: created_at,
        })
    }

    /// Replaces the layout, keeping identity, authorship and creation time.
    pub fn revise(
        &self,
        draft: ConfigurationDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ConfigurationError> {
        draft.validate()?;
        Ok(Self {
            walls: draft.walls,
            targets: draft.targets,
            updated_at,
            ..self.clone()
        })
    }

    /// Identifier assigned by the configuration store.
    #[must_use]
    pub fn config_id(&self) -> &ConfigId {
        &self.config_id
    }

    /// User who authored the configuration.
    #[must_use]
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// Custom walls of the layout.
    #[must_use]
    pub fn walls(&self) -> &BTreeSet<Wall> {
        &self.walls
    }

    /// Candidate target cells, never empty.
    #[must_use]
    pub fn targets(&self) -> &BTreeSet<Cell> {
        &self.targets
    }

    /// Whether the configuration belongs to the shared baseline set.
    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        self.is_baseline
    }

    /// When the configuration was first stored.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the layout was last replaced.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Builds the board for rounds derived from this configuration.
    #[must_use]
    pub fn board(&self) -> Board {
        Board::with_custom_walls(self.walls.iter().copied())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationRecord {
    config_id: ConfigId,
    author_id: UserId,
    #[serde(default)]
    walls: BTreeSet<Wall>,
    targets: BTreeSet<Cell>,
    #[serde(default)]
    is_baseline: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ConfigurationRecord> for Configuration {
    type Error = ConfigurationError;

    fn try_from(record: ConfigurationRecord) -> Result<Self, Self::Error> {
        let mut configuration = Configuration::new(
            record.config_id,
            record.author_id,
            ConfigurationDraft {
                walls: record.walls,
                targets: record.targets,
            },
            record.is_baseline,
            record.created_at,
        )?;
        configuration.updated_at = record.updated_at.unwrap_or(record.created_at);
        Ok(configuration)
    }
}

fn validate_targets(targets: &BTreeSet<Cell>) -> Result<(), ConfigurationError> {
    if targets.is_empty() {
        return Err(ConfigurationError::NoTargets);
    }
    match targets.iter().find(|cell| cell.is_center()) {
        Some(cell) => Err(ConfigurationError::TargetInCenter(*cell)),
        None => Ok(()),
    }
}

/// Target a round asks a specific robot to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPosition {
    /// Robot that must reach the target.
    pub color: RobotColor,
    /// Cell the robot must come to rest on.
    pub cell: Cell,
}

/// Reasons a round description is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    /// The target cell lies inside the center block.
    #[error("target {0} lies inside the center block")]
    TargetInCenter(Cell),
    /// A robot starts on the target cell.
    #[error("robot {color:?} starts on the target cell {cell}")]
    TargetOccupied {
        /// Robot occupying the target.
        color: RobotColor,
        /// The target cell.
        cell: Cell,
    },
    /// The solved flag disagrees with the first-solve fields.
    #[error("round solve state is inconsistent")]
    InconsistentSolve,
}

/// Record of the first successful solve of a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirstSolve {
    /// User who solved the round first.
    pub by: UserId,
    /// When the first solve happened.
    pub at: DateTime<Utc>,
}

/// One playable puzzle instance derived from a configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RoundRecord", try_from = "RoundRecord")]
pub struct Round {
    round_id: RoundId,
    config_id: ConfigId,
    author_id: UserId,
    created_at: DateTime<Utc>,
    initial_robots: Robots,
    target: TargetPosition,
    board: Board,
    first_solve: Option<FirstSolve>,
}

impl Round {
    /// Creates an unsolved round after checking its placement invariants.
    pub fn new(
        round_id: RoundId,
        config_id: ConfigId,
        author_id: UserId,
        created_at: DateTime<Utc>,
        initial_robots: Robots,
        target: TargetPosition,
        board: Board,
    ) -> Result<Self, RoundError> {
        if target.cell.is_center() {
            return Err(RoundError::TargetInCenter(target.cell));
        }
        if let Some(color) = initial_robots.occupant(target.cell) {
            return Err(RoundError::TargetOccupied {
                color,
                cell: target.cell,
            });
        }
        Ok(Self {
            round_id,
            config_id,
            author_id,
            created_at,
            initial_robots,
            target,
            board,
            first_solve: None,
        })
    }

    /// Unique identifier of the round.
    #[must_use]
    pub fn round_id(&self) -> &RoundId {
        &self.round_id
    }

    /// Configuration the round was generated from.
    #[must_use]
    pub fn config_id(&self) -> &ConfigId {
        &self.config_id
    }

    /// User who generated the round. Only they may delete it.
    #[must_use]
    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    /// When the round was generated.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Robot positions at the start of the round.
    #[must_use]
    pub const fn initial_robots(&self) -> &Robots {
        &self.initial_robots
    }

    /// Target robot and cell.
    #[must_use]
    pub const fn target(&self) -> TargetPosition {
        self.target
    }

    /// Wall topology of the round.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// First successful solve, if any.
    #[must_use]
    pub fn first_solve(&self) -> Option<&FirstSolve> {
        self.first_solve.as_ref()
    }

    /// Whether anyone has solved the round.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        self.first_solve.is_some()
    }

    /// Records the first solve. Later calls leave the record untouched and
    /// return `false`.
    pub fn mark_solved(&mut self, by: UserId, at: DateTime<Utc>) -> bool {
        if self.first_solve.is_some() {
            return false;
        }
        self.first_solve = Some(FirstSolve { by, at });
        true
    }

    /// Reports whether the target robot rests on the target cell.
    #[must_use]
    pub fn is_reached_by(&self, robots: &Robots) -> bool {
        robots.cell(self.target.color) == self.target.cell
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundRecord {
    round_id: RoundId,
    config_id: ConfigId,
    author_id: UserId,
    created_at: DateTime<Utc>,
    initial_robot_positions: Robots,
    target_position: TargetPosition,
    walls: Board,
    #[serde(default)]
    is_solved: bool,
    #[serde(default)]
    first_solved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    first_solved_by: Option<UserId>,
}

impl From<Round> for RoundRecord {
    fn from(round: Round) -> Self {
        let is_solved = round.is_solved();
        let (first_solved_by, first_solved_at) = match round.first_solve {
            Some(FirstSolve { by, at }) => (Some(by), Some(at)),
            None => (None, None),
        };
        Self {
            round_id: round.round_id,
            config_id: round.config_id,
            author_id: round.author_id,
            created_at: round.created_at,
            initial_robot_positions: round.initial_robots,
            target_position: round.target,
            walls: round.board,
            is_solved,
            first_solved_at,
            first_solved_by,
        }
    }
}

impl TryFrom<RoundRecord> for Round {
    type Error = RoundError;

    fn try_from(record: RoundRecord) -> Result<Self, Self::Error> {
        let mut round = Round::new(
            record.round_id,
            record.config_id,
            record.author_id,
            record.created_at,
            record.initial_robot_positions,
            record.target_position,
            record.walls,
        )?;
        let solve = (
            record.is_solved,
            record.first_solved_by,
            record.first_solved_at,
        );
        round.first_solve = match solve {
            (true, Some(by), Some(at)) => Some(FirstSolve { by, at }),
            (false, None, None) => None,
            _ => return Err(RoundError::InconsistentSolve),
        };
        Ok(round)
    }
}
