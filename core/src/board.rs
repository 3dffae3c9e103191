use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Cell, Side, BOARD_SIZE, CENTER_CELLS, SIDES};

/// Wall attached to one side of a cell.
///
/// A wall on `(x, y, right)` blocks the same edge as a wall on
/// `(x + 1, y, left)`. Boards store both records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Wall {
    cell: Cell,
    side: Side,
}

impl Wall {
    /// Creates a wall on the provided side of the cell.
    #[must_use]
    pub const fn new(cell: Cell, side: Side) -> Self {
        Self { cell, side }
    }

    /// Cell the wall record is attached to.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Side of the cell the wall covers.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Equivalent wall record on the neighbouring cell.
    ///
    /// Returns `None` for walls on the board perimeter, where no neighbour exists.
    #[must_use]
    pub const fn mirror(&self) -> Option<Wall> {
        match self.cell.step(self.side.direction()) {
            Some(neighbor) => Some(Wall::new(neighbor, self.side.opposite())),
            None => None,
        }
    }

    /// Reports whether the wall lies on the outer edge of the board.
    #[must_use]
    pub const fn is_perimeter(&self) -> bool {
        self.mirror().is_none()
    }
}

/// Immutable wall topology of the 16×16 board.
///
/// Every board contains the fixed walls (outer perimeter and the center
/// block) merged with the custom walls of a configuration. Each inserted wall
/// is stored together with its mirror so either record can be queried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Wall>", from = "Vec<Wall>")]
pub struct Board {
    walls: BTreeSet<Wall>,
}

impl Board {
    /// Creates a board containing only the fixed walls.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_custom_walls(std::iter::empty())
    }

    /// Creates a board from the fixed walls and the provided custom walls.
    ///
    /// Mirror records are inserted for every wall; custom walls that duplicate
    /// fixed ones are absorbed.
    #[must_use]
    pub fn with_custom_walls<I>(walls: I) -> Self
    where
        I: IntoIterator<Item = Wall>,
    {
        let mut all = fixed_walls();
        for wall in walls {
            all.extend(std::iter::once(wall).chain(wall.mirror()));
        }
        Self { walls: all }
    }

    /// Reports whether a wall blocks the provided side of the cell.
    ///
    /// Perimeter sides are always walled, independent of the stored records.
    #[must_use]
    pub fn has_wall(&self, cell: Cell, side: Side) -> bool {
        let wall = Wall::new(cell, side);
        wall.is_perimeter() || self.walls.contains(&wall)
    }

    /// Iterates every wall record of the board in deterministic order.
    pub fn walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.walls.iter().copied()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Board> for Vec<Wall> {
    fn from(board: Board) -> Self {
        board.walls().collect()
    }
}

impl From<Vec<Wall>> for Board {
    fn from(walls: Vec<Wall>) -> Self {
        Self::with_custom_walls(walls)
    }
}

/// Walls that exist on every board: the outer perimeter and all sides of the
/// center block, including the mirror records around it.
#[must_use]
pub fn fixed_walls() -> BTreeSet<Wall> {
    let mut walls = BTreeSet::new();
    let last = BOARD_SIZE - 1;

    for i in 0..BOARD_SIZE {
        let _ = walls.insert(Wall::new(Cell::new(0, i), Side::Left));
        let _ = walls.insert(Wall::new(Cell::new(last, i), Side::Right));
        let _ = walls.insert(Wall::new(Cell::new(i, 0), Side::Top));
        let _ = walls.insert(Wall::new(Cell::new(i, last), Side::Bottom));
    }

    for cell in CENTER_CELLS {
        for side in SIDES {
            let wall = Wall::new(cell, side);
            let _ = walls.insert(wall);
            if let Some(mirror) = wall.mirror() {
                let _ = walls.insert(mirror);
            }
        }
    }

    walls
}
