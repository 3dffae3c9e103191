#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round generator that places robots and picks a target for a configuration.
//!
//! All randomness comes from the caller-supplied [`Rng`], so seeding a
//! deterministic generator such as `ChaCha8Rng` reproduces the same round,
//! identifier included.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::{seq::SliceRandom, Rng};
use ricochet_core::{
    Board, Cell, ConfigId, Configuration, RobotColor, Robots, RobotsError, Round, RoundError,
    RoundId, TargetPosition, UserId, BOARD_SIZE, ROBOT_COLORS, ROBOT_COUNT,
};
use thiserror::Error;

/// Default number of placement attempts before generation gives up.
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Tuning knobs for round generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Upper bound on robot re-rolls while keeping the target cell free, and
    /// on target samples when a layout lists no target.
    pub max_placement_attempts: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Reasons round generation fails.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Every placement attempt left a robot on the target cell.
    #[error("could not keep target {target} free after {attempts} placement attempts")]
    Exhausted {
        /// Target cell that stayed occupied.
        target: Cell,
        /// Number of attempts made.
        attempts: u32,
    },
    /// No target cell outside the center block was sampled.
    #[error("could not sample a target cell after {attempts} attempts")]
    NoTarget {
        /// Number of samples drawn.
        attempts: u32,
    },
    /// The generated robot placement violated its invariants.
    #[error(transparent)]
    Placement(#[from] RobotsError),
    /// The generated round violated its invariants.
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Generates an unsolved round from the provided configuration on behalf of
/// `author_id`.
pub fn generate_round<R>(
    configuration: &Configuration,
    author_id: &UserId,
    created_at: DateTime<Utc>,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<Round, GenerationError>
where
    R: Rng + ?Sized,
{
    generate_round_on(
        configuration.config_id().clone(),
        configuration.board(),
        configuration.targets(),
        author_id,
        created_at,
        rng,
        settings,
    )
}

/// Generates a round on an explicit board.
///
/// When `targets` is empty a target is sampled among every cell outside the
/// center block.
pub fn generate_round_on<R>(
    config_id: ConfigId,
    board: Board,
    targets: &BTreeSet<Cell>,
    author_id: &UserId,
    created_at: DateTime<Utc>,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<Round, GenerationError>
where
    R: Rng + ?Sized,
{
    let cell = pick_target(targets, rng, settings)?;
    let color = pick_color(rng);
    let robots = place_robots(cell, rng, settings)?;
    let round_id = RoundId::new(
        uuid::Builder::from_random_bytes(rng.gen())
            .into_uuid()
            .to_string(),
    );

    let round = Round::new(
        round_id,
        config_id,
        author_id.clone(),
        created_at,
        robots,
        TargetPosition { color, cell },
        board,
    )?;
    info!(
        "generated round {} from configuration {}: {color} robot to {cell}",
        round.round_id(),
        round.config_id()
    );
    Ok(round)
}

fn pick_target<R>(
    targets: &BTreeSet<Cell>,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<Cell, GenerationError>
where
    R: Rng + ?Sized,
{
    if !targets.is_empty() {
        let index = rng.gen_range(0..targets.len());
        if let Some(cell) = targets.iter().nth(index) {
            return Ok(*cell);
        }
    }

    for _ in 0..settings.max_placement_attempts {
        let x = rng.gen_range(0..BOARD_SIZE);
        let y = rng.gen_range(0..BOARD_SIZE);
        if let Some(cell) = Cell::try_new(x, y).filter(|cell| !cell.is_center()) {
            debug!("sampled fallback target {cell}");
            return Ok(cell);
        }
    }
    Err(GenerationError::NoTarget {
        attempts: settings.max_placement_attempts,
    })
}

fn pick_color<R>(rng: &mut R) -> RobotColor
where
    R: Rng + ?Sized,
{
    ROBOT_COLORS[rng.gen_range(0..ROBOT_COUNT)]
}

fn place_robots<R>(
    target: Cell,
    rng: &mut R,
    settings: &GenerationSettings,
) -> Result<Robots, GenerationError>
where
    R: Rng + ?Sized,
{
    let free: Vec<Cell> = Cell::all().filter(|cell| !cell.is_center()).collect();

    for attempt in 1..=settings.max_placement_attempts {
        let cells = shuffled_placement(free.clone(), rng);
        if cells.contains(&target) {
            debug!("placement attempt {attempt} covered target {target}, re-rolling");
            continue;
        }
        return Ok(Robots::new(cells)?);
    }

    Err(GenerationError::Exhausted {
        target,
        attempts: settings.max_placement_attempts,
    })
}

/// Draws distinct cells for the robots, assigned in [`ROBOT_COLORS`] order.
fn shuffled_placement<R>(mut candidates: Vec<Cell>, rng: &mut R) -> [Cell; ROBOT_COUNT]
where
    R: Rng + ?Sized,
{
    let (chosen, _) = candidates.partial_shuffle(rng, ROBOT_COUNT);
    let mut cells = [Cell::new(0, 0); ROBOT_COUNT];
    cells.copy_from_slice(chosen);
    cells
}
