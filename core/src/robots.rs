use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Cell, Direction, ROBOT_COUNT};

/// Robot colors in the fixed order used for placement and iteration.
pub const ROBOT_COLORS: [RobotColor; ROBOT_COUNT] = [
    RobotColor::Silver,
    RobotColor::Green,
    RobotColor::Red,
    RobotColor::Yellow,
    RobotColor::Blue,
];

/// Color identifying one of the five robots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotColor {
    /// The silver robot.
    Silver,
    /// The green robot.
    Green,
    /// The red robot.
    Red,
    /// The yellow robot.
    Yellow,
    /// The blue robot.
    Blue,
}

impl RobotColor {
    /// Position of the color within [`ROBOT_COLORS`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            RobotColor::Silver => 0,
            RobotColor::Green => 1,
            RobotColor::Red => 2,
            RobotColor::Yellow => 3,
            RobotColor::Blue => 4,
        }
    }
}

/// Reasons a robot placement is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RobotsError {
    /// Two robots were placed on the same cell.
    #[error("robots {first:?} and {second:?} share cell {cell}")]
    SharedCell {
        /// First robot found on the cell.
        first: RobotColor,
        /// Second robot found on the cell.
        second: RobotColor,
        /// Cell both robots claim.
        cell: Cell,
    },
    /// A robot was placed inside the center block.
    #[error("robot {color:?} placed inside the center block at {cell}")]
    InCenter {
        /// Robot placed in the center.
        color: RobotColor,
        /// Offending cell.
        cell: Cell,
    },
    /// A robot color had no position.
    #[error("no position given for robot {0:?}")]
    Missing(RobotColor),
}

/// Positions of all five robots.
///
/// Invariant: robots occupy pairwise distinct cells, none inside the center block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<RobotColor, Cell>",
    try_from = "BTreeMap<RobotColor, Cell>"
)]
pub struct Robots {
    cells: [Cell; ROBOT_COUNT],
}

impl Robots {
    /// Places the robots on the provided cells, listed in [`ROBOT_COLORS`] order.
    pub fn new(cells: [Cell; ROBOT_COUNT]) -> Result<Self, RobotsError> {
        for (index, cell) in cells.iter().enumerate() {
            let color = ROBOT_COLORS[index];
            if cell.is_center() {
                return Err(RobotsError::InCenter { color, cell: *cell });
            }
            if let Some(first) = cells[..index].iter().position(|other| other == cell) {
                return Err(RobotsError::SharedCell {
                    first: ROBOT_COLORS[first],
                    second: color,
                    cell: *cell,
                });
            }
        }
        Ok(Self { cells })
    }

    /// Cell currently occupied by the robot of the provided color.
    #[must_use]
    pub const fn cell(&self, color: RobotColor) -> Cell {
        self.cells[color.index()]
    }

    /// Robot occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: Cell) -> Option<RobotColor> {
        self.cells
            .iter()
            .position(|occupied| *occupied == cell)
            .map(|index| ROBOT_COLORS[index])
    }

    /// Reports whether any robot occupies the provided cell.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterates robots and their cells in [`ROBOT_COLORS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (RobotColor, Cell)> + '_ {
        ROBOT_COLORS.iter().copied().zip(self.cells.iter().copied())
    }

    /// Returns a copy of the positions with one robot moved to `cell`.
    ///
    /// The destination must be free and outside the center block; cells
    /// produced by the movement resolver always are.
    #[must_use]
    pub fn relocated(&self, color: RobotColor, cell: Cell) -> Self {
        debug_assert!(
            self.occupant(cell).map_or(true, |occupant| occupant == color),
            "destination {cell} is occupied"
        );
        debug_assert!(!cell.is_center(), "destination {cell} is in the center");
        let mut cells = self.cells;
        cells[color.index()] = cell;
        Self { cells }
    }
}

impl From<Robots> for BTreeMap<RobotColor, Cell> {
    fn from(robots: Robots) -> Self {
        robots.iter().collect()
    }
}

impl TryFrom<BTreeMap<RobotColor, Cell>> for Robots {
    type Error = RobotsError;

    fn try_from(mut positions: BTreeMap<RobotColor, Cell>) -> Result<Self, Self::Error> {
        let mut cells = [Cell::new(0, 0); ROBOT_COUNT];
        for color in ROBOT_COLORS {
            cells[color.index()] = positions
                .remove(&color)
                .ok_or(RobotsError::Missing(color))?;
        }
        Robots::new(cells)
    }
}

/// One player action: slide a robot in a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Move {
    /// Robot being moved.
    pub color: RobotColor,
    /// Direction of the slide.
    pub direction: Direction,
}

impl Move {
    /// Creates a new move.
    #[must_use]
    pub const fn new(color: RobotColor, direction: Direction) -> Self {
        Self { color, direction }
    }
}
