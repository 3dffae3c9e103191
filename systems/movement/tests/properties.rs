use proptest::prelude::*;
use ricochet_core::{
    Board, Cell, Direction, Move, RobotColor, Robots, Side, Wall, DIRECTIONS, ROBOT_COLORS, SIDES,
};
use ricochet_system_movement::{apply_move, is_blocked, resolve_move};

fn free_cells() -> Vec<Cell> {
    Cell::all().filter(|cell| !cell.is_center()).collect()
}

fn robots() -> impl Strategy<Value = Robots> {
    proptest::sample::subsequence(free_cells(), 5)
        .prop_shuffle()
        .prop_map(|cells| {
            let cells: [Cell; 5] = cells.try_into().expect("five cells");
            Robots::new(cells).expect("distinct non-center cells")
        })
}

fn walls() -> impl Strategy<Value = Vec<Wall>> {
    proptest::collection::vec(
        (0u8..16, 0u8..16, 0usize..4).prop_map(|(x, y, side)| Wall::new(Cell::new(x, y), SIDES[side])),
        0..48,
    )
}

fn color() -> impl Strategy<Value = RobotColor> {
    (0usize..5).prop_map(|index| ROBOT_COLORS[index])
}

fn direction() -> impl Strategy<Value = Direction> {
    (0usize..4).prop_map(|index| DIRECTIONS[index])
}

fn path(from: Cell, to: Cell, direction: Direction) -> Vec<Cell> {
    let mut cells = vec![from];
    let mut current = from;
    while current != to {
        current = current
            .step(direction)
            .expect("destination lies along the direction of travel");
        cells.push(current);
    }
    cells
}

fn separated(board: &Board, from: Cell, to: Cell, direction: Direction) -> bool {
    board.has_wall(from, direction.side()) || board.has_wall(to, direction.opposite().side())
}

proptest! {
    #[test]
    fn resolution_is_deterministic(
        robots in robots(),
        walls in walls(),
        color in color(),
        direction in direction(),
    ) {
        let board = Board::with_custom_walls(walls);
        let before = robots;

        let first = resolve_move(&robots, &board, color, direction);
        let second = resolve_move(&robots, &board, color, direction);
        prop_assert_eq!(first, second);
        prop_assert_eq!(robots, before);

        let mv = Move::new(color, direction);
        let outcome = apply_move(&robots, &board, mv);
        prop_assert_eq!(outcome, apply_move(&robots, &board, mv));
        prop_assert_eq!(outcome.to, first);
        prop_assert_eq!(robots, before);
    }

    #[test]
    fn resolution_stays_on_free_cells_and_respects_walls(
        robots in robots(),
        walls in walls(),
        color in color(),
        direction in direction(),
    ) {
        let board = Board::with_custom_walls(walls);
        let from = robots.cell(color);
        let to = resolve_move(&robots, &board, color, direction);

        prop_assert!(to.x() < 16 && to.y() < 16);
        prop_assert!(!to.is_center());
        prop_assert!(robots.occupant(to).map_or(true, |occupant| occupant == color));

        let cells = path(from, to, direction);
        for pair in cells.windows(2) {
            prop_assert!(!separated(&board, pair[0], pair[1], direction));
            prop_assert!(!robots.is_occupied(pair[1]));
        }

        let moved = robots.relocated(color, to);
        prop_assert!(is_blocked(&moved, &board, color, direction));
    }

    #[test]
    fn blocked_robot_keeps_its_cell(
        robots in robots(),
        walls in walls(),
        color in color(),
        direction in direction(),
    ) {
        let board = Board::with_custom_walls(walls);
        let from = robots.cell(color);
        let blocked = match from.step(direction) {
            None => true,
            Some(next) => separated(&board, from, next, direction) || robots.is_occupied(next),
        };
        prop_assert_eq!(is_blocked(&robots, &board, color, direction), blocked);
        if blocked {
            prop_assert_eq!(resolve_move(&robots, &board, color, direction), from);
        }
    }
}

#[test]
fn perimeter_blocks_every_edge_robot() {
    let robots = Robots::new([
        Cell::new(0, 3),
        Cell::new(15, 3),
        Cell::new(3, 0),
        Cell::new(3, 15),
        Cell::new(5, 5),
    ])
    .expect("valid placement");
    let board = Board::standard();
    assert!(is_blocked(&robots, &board, RobotColor::Silver, Direction::Left));
    assert!(is_blocked(&robots, &board, RobotColor::Green, Direction::Right));
    assert!(is_blocked(&robots, &board, RobotColor::Red, Direction::Up));
    assert!(is_blocked(&robots, &board, RobotColor::Yellow, Direction::Down));
    assert!(!is_blocked(&robots, &board, RobotColor::Blue, Direction::Up));
    assert!(board.has_wall(Cell::new(0, 3), Side::Left));
}
