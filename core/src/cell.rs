use serde::{Deserialize, Serialize};

use crate::BOARD_SIZE;

/// Cells forming the walled-off 2×2 block in the middle of the board.
pub const CENTER_CELLS: [Cell; 4] = [
    Cell::new(7, 7),
    Cell::new(8, 7),
    Cell::new(7, 8),
    Cell::new(8, 8),
];

/// Every side a wall may be attached to, in canonical order.
pub const SIDES: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

/// Every direction a robot may slide in, in canonical order.
pub const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Location of a single board cell.
///
/// `x` grows to the right and `y` grows downward, so `(0, 0)` is the top-left
/// corner and `(15, 15)` the bottom-right one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    x: u8,
    y: u8,
}

impl Cell {
    /// Creates a new cell coordinate.
    ///
    /// # Panics
    ///
    /// Panics when either component lies outside the board. Use
    /// [`Cell::try_new`] for untrusted input.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < BOARD_SIZE && y < BOARD_SIZE, "cell outside the board");
        Self { x, y }
    }

    /// Creates a cell coordinate, returning `None` when it lies outside the board.
    #[must_use]
    pub const fn try_new(x: u8, y: u8) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }

    /// Dense row-major index of the cell, in `0..256`.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    /// Reports whether the cell belongs to the walled-off center block.
    #[must_use]
    pub const fn is_center(&self) -> bool {
        (self.x == 7 || self.x == 8) && (self.y == 7 || self.y == 8)
    }

    /// Returns the neighbouring cell in the provided direction, if it exists.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::Up => {
                if self.y == 0 {
                    None
                } else {
                    Some(Self {
                        x: self.x,
                        y: self.y - 1,
                    })
                }
            }
            Direction::Down => Self::try_new(self.x, self.y + 1),
            Direction::Left => {
                if self.x == 0 {
                    None
                } else {
                    Some(Self {
                        x: self.x - 1,
                        y: self.y,
                    })
                }
            }
            Direction::Right => Self::try_new(self.x + 1, self.y),
        }
    }

    /// Iterates every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Cell { x, y }))
    }
}

/// Side of a cell a wall can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Edge shared with the cell above.
    Top,
    /// Edge shared with the cell below.
    Bottom,
    /// Edge shared with the cell to the left.
    Left,
    /// Edge shared with the cell to the right.
    Right,
}

impl Side {
    /// Side facing the opposite way, as seen from the neighbouring cell.
    #[must_use]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction that crosses this side when leaving the cell.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Side::Top => Direction::Up,
            Side::Bottom => Direction::Down,
            Side::Left => Direction::Left,
            Side::Right => Direction::Right,
        }
    }
}

/// Direction a robot slides in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing `y`.
    Up,
    /// Movement toward increasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Side of the departing cell crossed when moving in this direction.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Direction::Up => Side::Top,
            Direction::Down => Side::Bottom,
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
