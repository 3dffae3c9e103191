//! Plain-text drawing of a board for the terminal.

use std::fmt::Write as _;

use ricochet_core::{Board, Cell, RobotColor, Robots, Side, TargetPosition, BOARD_SIZE};

/// Draws the board with robots as capital initials and the target as the
/// lower-case initial of the robot that must reach it.
pub(crate) fn board(board: &Board, robots: &Robots, target: TargetPosition) -> String {
    let mut out = String::new();
    out.push('+');
    for _ in 0..BOARD_SIZE {
        out.push_str("-+");
    }
    out.push('\n');

    for y in 0..BOARD_SIZE {
        out.push('|');
        for x in 0..BOARD_SIZE {
            let cell = Cell::new(x, y);
            out.push(glyph(cell, robots, target));
            out.push(if board.has_wall(cell, Side::Right) {
                '|'
            } else {
                ' '
            });
        }
        out.push('\n');

        out.push('+');
        for x in 0..BOARD_SIZE {
            let cell = Cell::new(x, y);
            out.push(if board.has_wall(cell, Side::Bottom) {
                '-'
            } else {
                ' '
            });
            out.push('+');
        }
        out.push('\n');
    }
    out
}

/// One-line description of the robots and the target.
pub(crate) fn legend(robots: &Robots, target: TargetPosition) -> String {
    let mut out = String::new();
    for (color, cell) in robots.iter() {
        let _ = write!(out, "{color}@{cell} ");
    }
    let _ = write!(out, "| target: {} to {}", target.color, target.cell);
    out
}

fn glyph(cell: Cell, robots: &Robots, target: TargetPosition) -> char {
    if let Some(color) = robots.occupant(cell) {
        return initial(color).to_ascii_uppercase();
    }
    if cell == target.cell {
        return initial(target.color);
    }
    if cell.is_center() {
        return '#';
    }
    '.'
}

const fn initial(color: RobotColor) -> char {
    match color {
        RobotColor::Silver => 's',
        RobotColor::Green => 'g',
        RobotColor::Red => 'r',
        RobotColor::Blue => 'b',
        RobotColor::Yellow => 'y',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_robots_target_and_center() {
        let robots = Robots::new([
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(3, 0),
            Cell::new(4, 0),
        ])
        .expect("valid placement");
        let target = TargetPosition {
            color: RobotColor::Yellow,
            cell: Cell::new(5, 0),
        };

        let drawing = board(&Board::standard(), &robots, target);
        let lines: Vec<&str> = drawing.lines().collect();
        assert_eq!(lines.len(), 1 + 2 * usize::from(BOARD_SIZE));
        assert!(lines[1].starts_with("|S G R Y B y"));
        assert!(lines[1].ends_with('|'));
        assert!(lines[15].contains("|#|#|"));
    }

    #[test]
    fn legend_names_every_robot() {
        let robots = Robots::new([
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(3, 0),
            Cell::new(4, 0),
        ])
        .expect("valid placement");
        let target = TargetPosition {
            color: RobotColor::Red,
            cell: Cell::new(9, 9),
        };
        let legend = legend(&robots, target);
        assert!(legend.starts_with("silver@0,0 green@1,0"));
        assert!(legend.ends_with("target: red to 9,9"));
    }
}
