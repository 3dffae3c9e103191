#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative play state for a single Ricochet round.
//!
//! [`GameState`] is an immutable snapshot of robot positions and the number
//! of moves played; every move produces a new snapshot. [`Session`] is the
//! only mutable wrapper. Adapters change it exclusively through [`apply`] and
//! read it through the [`query`] module.

use log::debug;
use ricochet_core::{Board, Command, Event, Move, Robots, Round, MAX_SCORED_MOVES};
use ricochet_system_movement::{apply_move, MoveOutcome};

/// Robot positions and move count after a number of turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    robots: Robots,
    move_count: u32,
}

impl GameState {
    /// Creates the state at the start of a round.
    #[must_use]
    pub const fn new(robots: Robots) -> Self {
        Self {
            robots,
            move_count: 0,
        }
    }

    /// Current robot positions.
    #[must_use]
    pub const fn robots(&self) -> &Robots {
        &self.robots
    }

    /// Number of moves played to reach this state.
    #[must_use]
    pub const fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Plays one move and returns the following state.
    ///
    /// The move counter advances even when the robot cannot leave its cell;
    /// callers decide whether such a move is acceptable.
    #[must_use]
    pub fn advance(&self, board: &Board, mv: Move) -> (GameState, MoveOutcome) {
        let outcome = apply_move(&self.robots, board, mv);
        let next = GameState {
            robots: outcome.robots,
            move_count: self.move_count.saturating_add(1),
        };
        (next, outcome)
    }
}

/// Interactive play of one round, with undo history.
#[derive(Clone, Debug)]
pub struct Session {
    round: Round,
    state: GameState,
    history: Vec<GameState>,
    moves: Vec<Move>,
}

impl Session {
    /// Starts playing the provided round from its initial positions.
    #[must_use]
    pub fn new(round: Round) -> Self {
        let state = GameState::new(*round.initial_robots());
        Self {
            round,
            state,
            history: Vec::new(),
            moves: Vec::new(),
        }
    }
}

/// Applies the provided command to the session, emitting resulting events.
///
/// Moves that leave the robot in place are not recorded and only produce
/// [`Event::MoveBlocked`].
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MoveRobot { color, direction } => {
            let mv = Move::new(color, direction);
            let (next, outcome) = session.state.advance(session.round.board(), mv);
            if !outcome.displaced() {
                out_events.push(Event::MoveBlocked { color, direction });
                return;
            }

            session.history.push(session.state);
            session.moves.push(mv);
            session.state = next;

            let move_count = next.move_count();
            out_events.push(Event::RobotMoved {
                color,
                direction,
                from: outcome.from,
                to: outcome.to,
                move_count,
            });
            if session.round.is_reached_by(next.robots()) {
                out_events.push(Event::TargetReached { move_count });
            }
            if move_count == MAX_SCORED_MOVES + 1 {
                out_events.push(Event::SaveDisabled { move_count });
            }
        }
        Command::UndoMove => {
            let (Some(previous), Some(mv)) = (session.history.pop(), session.moves.pop()) else {
                return;
            };
            let from = session.state.robots().cell(mv.color);
            let to = previous.robots().cell(mv.color);
            session.state = previous;
            debug!("undid {mv}, {} moves remain", previous.move_count());
            out_events.push(Event::MoveUndone {
                color: mv.color,
                from,
                to,
                move_count: previous.move_count(),
            });
        }
        Command::ResetRound => {
            session.state = GameState::new(*session.round.initial_robots());
            session.history.clear();
            session.moves.clear();
            debug!("reset round {}", session.round.round_id());
            out_events.push(Event::RoundReset);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use ricochet_core::{Move, Robots, MAX_SCORED_MOVES};

    use super::Session;

    /// Current robot positions.
    #[must_use]
    pub fn robots(session: &Session) -> &Robots {
        session.state.robots()
    }

    /// Number of effective moves played since the start or the last reset.
    #[must_use]
    pub fn move_count(session: &Session) -> u32 {
        session.state.move_count()
    }

    /// Moves played so far, oldest first.
    #[must_use]
    pub fn moves(session: &Session) -> &[Move] {
        &session.moves
    }

    /// Whether the target robot currently rests on the target cell.
    #[must_use]
    pub fn is_solved(session: &Session) -> bool {
        session.round.is_reached_by(session.state.robots())
    }

    /// Whether the current solution may be submitted for scoring.
    #[must_use]
    pub fn can_save(session: &Session) -> bool {
        let moves = move_count(session);
        is_solved(session) && moves > 0 && moves <= MAX_SCORED_MOVES
    }
}
