//! String encodings used at the storage and API boundary.
//!
//! Cells travel as `"x,y"`, walls as `"x,y,side"` and moves as
//! `"color-direction"`. Everything inside the engine works on the typed values;
//! these conversions are the only place the strings are produced or parsed.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{Cell, Direction, Move, RobotColor, Side, Wall};

/// Errors raised while decoding boundary strings.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// The cell string was not two comma separated integers.
    #[error("malformed cell '{0}', expected \"x,y\"")]
    MalformedCell(String),
    /// The coordinates lie outside the 16×16 board.
    #[error("cell '{0}' lies outside the board")]
    OutOfBounds(String),
    /// The wall string was not `x,y,side`.
    #[error("malformed wall '{0}', expected \"x,y,side\"")]
    MalformedWall(String),
    /// The move string was not `color-direction`.
    #[error("malformed move '{0}', expected \"color-direction\"")]
    MalformedMove(String),
    /// Unknown wall side name.
    #[error("unknown wall side '{0}'")]
    UnknownSide(String),
    /// Unknown direction name.
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
    /// Unknown robot color name.
    #[error("unknown robot color '{0}'")]
    UnknownColor(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x(), self.y())
    }
}

impl FromStr for Cell {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| WireError::MalformedCell(value.to_owned()))?;
        parse_cell(x, y).map_err(|error| match error {
            CellParse::Malformed => WireError::MalformedCell(value.to_owned()),
            CellParse::OutOfBounds => WireError::OutOfBounds(value.to_owned()),
        })
    }
}

enum CellParse {
    Malformed,
    OutOfBounds,
}

fn parse_cell(x: &str, y: &str) -> Result<Cell, CellParse> {
    let x = x.trim().parse::<u8>().map_err(|_| CellParse::Malformed)?;
    let y = y.trim().parse::<u8>().map_err(|_| CellParse::Malformed)?;
    Cell::try_new(x, y).ok_or(CellParse::OutOfBounds)
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

impl FromStr for Side {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "top" => Ok(Side::Top),
            "bottom" => Ok(Side::Bottom),
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(WireError::UnknownSide(other.to_owned())),
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.cell(), self.side())
    }
}

impl FromStr for Wall {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(',');
        let (Some(x), Some(y), Some(side), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(WireError::MalformedWall(value.to_owned()));
        };
        let cell = parse_cell(x, y).map_err(|error| match error {
            CellParse::Malformed => WireError::MalformedWall(value.to_owned()),
            CellParse::OutOfBounds => WireError::OutOfBounds(value.to_owned()),
        })?;
        Ok(Wall::new(cell, side.parse()?))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

impl FromStr for Direction {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(WireError::UnknownDirection(other.to_owned())),
        }
    }
}

impl fmt::Display for RobotColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RobotColor::Silver => "silver",
            RobotColor::Green => "green",
            RobotColor::Red => "red",
            RobotColor::Yellow => "yellow",
            RobotColor::Blue => "blue",
        })
    }
}

impl FromStr for RobotColor {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "silver" => Ok(RobotColor::Silver),
            "green" => Ok(RobotColor::Green),
            "red" => Ok(RobotColor::Red),
            "yellow" => Ok(RobotColor::Yellow),
            "blue" => Ok(RobotColor::Blue),
            other => Err(WireError::UnknownColor(other.to_owned())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.color, self.direction)
    }
}

impl FromStr for Move {
    type Err = WireError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (color, direction) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| WireError::MalformedMove(value.to_owned()))?;
        Ok(Move::new(color.parse()?, direction.parse()?))
    }
}

/// Parses a comma or whitespace separated list of moves.
pub fn parse_moves(value: &str) -> Result<Vec<Move>, WireError> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

/// Formats moves as a comma separated list accepted by [`parse_moves`].
#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

macro_rules! string_boundary {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.to_string()
                }
            }

            impl TryFrom<String> for $ty {
                type Error = WireError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )*
    };
}

string_boundary!(Cell, Wall, Move);
