#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement resolver that slides robots until they stop.
//!
//! A robot keeps moving in the requested direction while the next cell is on
//! the board, no wall separates the two cells and no other robot occupies the
//! next cell. The resolver is a pure function of its inputs; the world and
//! the score evaluator both call it, so play and replay can never disagree.

use log::debug;
use ricochet_core::{Board, Cell, Direction, Move, RobotColor, Robots};

/// Result of applying one move to a set of robot positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Robot that was asked to move.
    pub color: RobotColor,
    /// Requested direction.
    pub direction: Direction,
    /// Cell the robot started from.
    pub from: Cell,
    /// Cell the robot came to rest on.
    pub to: Cell,
    /// Positions of every robot after the move.
    pub robots: Robots,
}

impl MoveOutcome {
    /// Reports whether the robot left its starting cell.
    #[must_use]
    pub fn displaced(&self) -> bool {
        self.from != self.to
    }
}

/// Returns the cell a robot would come to rest on when sliding in `direction`.
///
/// The starting cell is returned unchanged when the very first step is blocked.
#[must_use]
pub fn resolve_move(
    robots: &Robots,
    board: &Board,
    color: RobotColor,
    direction: Direction,
) -> Cell {
    let mut current = robots.cell(color);
    while let Some(next) = next_cell(robots, board, current, direction) {
        current = next;
    }
    current
}

/// Reports whether the robot cannot leave its cell in `direction`.
#[must_use]
pub fn is_blocked(robots: &Robots, board: &Board, color: RobotColor, direction: Direction) -> bool {
    next_cell(robots, board, robots.cell(color), direction).is_none()
}

/// Resolves `mv` and returns the updated positions alongside the displacement.
#[must_use]
pub fn apply_move(robots: &Robots, board: &Board, mv: Move) -> MoveOutcome {
    let from = robots.cell(mv.color);
    let to = resolve_move(robots, board, mv.color, mv.direction);
    debug!("{mv}: {from} -> {to}");
    MoveOutcome {
        color: mv.color,
        direction: mv.direction,
        from,
        to,
        robots: robots.relocated(mv.color, to),
    }
}

/// Next cell reachable in one step from `from`, if the step is legal.
fn next_cell(robots: &Robots, board: &Board, from: Cell, direction: Direction) -> Option<Cell> {
    if board.has_wall(from, direction.side()) {
        return None;
    }
    let next = from.step(direction)?;
    if board.has_wall(next, direction.opposite().side()) || robots.is_occupied(next) {
        return None;
    }
    Some(next)
}
