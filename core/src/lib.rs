#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ricochet engine.
//!
//! This crate defines the vocabulary every other crate speaks: board cells
//! and walls, robot placements, moves, configurations, rounds and scores.
//! Adapters submit [`Command`] values describing what a player wants to do,
//! the world applies them to a play session and broadcasts [`Event`] values
//! describing what actually happened. Systems are pure functions over the
//! immutable records defined here, and persistence is reached only through
//! the traits in [`store`].

mod board;
mod cell;
mod robots;
mod round;
mod score;
pub mod store;
mod wire;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use board::{fixed_walls, Board, Wall};
pub use cell::{Cell, Direction, Side, CENTER_CELLS, DIRECTIONS, SIDES};
pub use robots::{Move, RobotColor, Robots, RobotsError, ROBOT_COLORS};
pub use round::{
    Configuration, ConfigurationDraft, ConfigurationError, FirstSolve, Round, RoundError,
    TargetPosition,
};
pub use score::{Identity, Medal, Score, Username, UsernameError};
pub use wire::{format_moves, parse_moves, WireError};

/// Number of cells along each edge of the board.
pub const BOARD_SIZE: u8 = 16;

/// Number of robots on every board.
pub const ROBOT_COUNT: usize = 5;

/// Largest move count that can still be recorded as a score.
pub const MAX_SCORED_MOVES: u32 = 98;

/// Commands that express every permissible change to a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Slides a robot until it hits a wall or another robot.
    MoveRobot {
        /// Robot to move.
        color: RobotColor,
        /// Direction of the slide.
        direction: Direction,
    },
    /// Reverts the most recent effective move.
    UndoMove,
    /// Returns every robot to its starting cell and clears the move log.
    ResetRound,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A robot slid to a new cell.
    RobotMoved {
        /// Robot that moved.
        color: RobotColor,
        /// Direction of the slide.
        direction: Direction,
        /// Cell the robot left.
        from: Cell,
        /// Cell the robot came to rest on.
        to: Cell,
        /// Moves played so far, including this one.
        move_count: u32,
    },
    /// A move request was ignored because the robot could not leave its cell.
    MoveBlocked {
        /// Robot that was asked to move.
        color: RobotColor,
        /// Requested direction.
        direction: Direction,
    },
    /// The most recent move was reverted.
    MoveUndone {
        /// Robot that returned.
        color: RobotColor,
        /// Cell the robot left when undoing.
        from: Cell,
        /// Cell the robot returned to.
        to: Cell,
        /// Moves remaining in the log.
        move_count: u32,
    },
    /// Every robot returned to its starting cell.
    RoundReset,
    /// The target robot rests on the target cell.
    TargetReached {
        /// Moves needed to reach the target.
        move_count: u32,
    },
    /// The move log grew beyond [`MAX_SCORED_MOVES`]; play continues but the
    /// solution can no longer be saved.
    SaveDisabled {
        /// Moves played so far.
        move_count: u32,
    },
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps the provided identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrows the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Opaque user identifier supplied by the identity provider.
    UserId
);
string_id!(
    /// Identifier of a generated round.
    RoundId
);
string_id!(
    /// Identifier of a board configuration.
    ConfigId
);
