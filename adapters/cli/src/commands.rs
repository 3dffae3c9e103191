//! Subcommand implementations, written against generic readers and writers.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{BufRead, Write},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ricochet_core::{
    format_moves,
    store::{ConfigurationStore, ProfileStore, RoundStore},
    Board, Command, ConfigId, ConfigurationDraft, Direction, Event, Identity, Move, RobotColor,
    Round, RoundId, UserId, Username,
};
use ricochet_store::MemoryBackend;
use ricochet_system_leaderboard::{global_leaderboard, rank_scores, user_summary};
use ricochet_system_round_generation::{generate_round, generate_round_on};
use ricochet_system_scoring::{submit_solution, SubmissionOutcome};
use ricochet_world::{self as world, query, Session};

use crate::{render, settings::Settings};

/// Configuration id given to rounds generated on the bare standard board.
const STANDARD_CONFIG_ID: &str = "standard";

/// Generates a practice round. Only a layout, when given, is stored; the
/// round itself is persisted by its first accepted solution.
///
/// Without a layout the round is placed on the standard board with a target
/// sampled anywhere outside the center block.
pub(crate) fn generate(
    backend: &MemoryBackend,
    settings: &Settings,
    layout: Option<ConfigurationDraft>,
    author: &UserId,
    seed: u64,
    now: DateTime<Utc>,
) -> Result<Round> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let round = match layout {
        Some(draft) => {
            let configuration = backend
                .configurations()
                .create(draft, author, now)
                .context("failed to store the board layout")?;
            generate_round(&configuration, author, now, &mut rng, &settings.generation)?
        }
        None => generate_round_on(
            ConfigId::new(STANDARD_CONFIG_ID),
            Board::standard(),
            &BTreeSet::new(),
            author,
            now,
            &mut rng,
            &settings.generation,
        )?,
    };
    Ok(round)
}

/// Prints the board of a round.
pub(crate) fn show(round: &Round, out: &mut impl Write) -> Result<()> {
    write!(
        out,
        "{}",
        render::board(round.board(), round.initial_robots(), round.target())
    )?;
    writeln!(out, "{}", render::legend(round.initial_robots(), round.target()))?;
    writeln!(
        out,
        "round {} by {} at {}",
        round.round_id(),
        round.author_id(),
        round.created_at()
    )?;
    if let Some(first) = round.first_solve() {
        writeln!(out, "first solved by {} at {}", first.by, first.at)?;
    }
    Ok(())
}

/// Validates a complete move list and records it for `user_id`.
pub(crate) fn solve(
    backend: &MemoryBackend,
    settings: &Settings,
    round: &Round,
    user_id: &UserId,
    moves: &[Move],
    out: &mut impl Write,
) -> Result<SubmissionOutcome> {
    let outcome = submit_solution(
        &backend.rounds(),
        &backend.scores(),
        round,
        user_id,
        moves,
        Utc::now(),
        &settings.scoring,
    )?;
    report(&outcome, out)?;
    Ok(outcome)
}

fn report(outcome: &SubmissionOutcome, out: &mut impl Write) -> Result<()> {
    match outcome {
        SubmissionOutcome::Recorded { score, first_solve } => {
            writeln!(
                out,
                "recorded {} moves as the new best (improvement #{})",
                score.moves, score.attempt_count
            )?;
            if *first_solve {
                writeln!(out, "first solve of round {}", score.round_id)?;
            }
        }
        SubmissionOutcome::NotImproved {
            current_best,
            submitted,
        } => writeln!(
            out,
            "{submitted} moves does not beat your best of {current_best}; nothing saved"
        )?,
    }
    Ok(())
}

enum Input {
    Play(Command),
    Show,
    Quit,
}

fn parse_input(line: &str) -> Result<Input> {
    let words: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .collect();
    match words.as_slice() {
        ["undo" | "u"] => Ok(Input::Play(Command::UndoMove)),
        ["reset"] => Ok(Input::Play(Command::ResetRound)),
        ["show" | "board"] => Ok(Input::Show),
        ["quit" | "q"] => Ok(Input::Quit),
        [color, direction] => Ok(Input::Play(Command::MoveRobot {
            color: color.parse::<RobotColor>()?,
            direction: direction.parse::<Direction>()?,
        })),
        _ => bail!("expected \"<color> <direction>\", undo, reset, show or quit"),
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::RobotMoved {
            color,
            direction,
            from,
            to,
            move_count,
        } => format!("#{move_count}: {color} {direction} {from} -> {to}"),
        Event::MoveBlocked { color, direction } => {
            format!("{color} cannot move {direction}; not counted")
        }
        Event::MoveUndone {
            color,
            from,
            to,
            move_count,
        } => format!("undid {color} {from} -> {to}, {move_count} moves played"),
        Event::RoundReset => "robots are back at their starting cells".to_owned(),
        Event::TargetReached { move_count } => format!("target reached in {move_count} moves"),
        Event::SaveDisabled { move_count } => {
            format!("{move_count} moves played; this attempt can no longer be saved")
        }
    }
}

/// Plays a round interactively, one command per input line.
///
/// Reaching the target submits the move log and ends the session. Returns
/// `None` when the player quits, input ends, or the solution is too long to save.
pub(crate) fn play(
    backend: &MemoryBackend,
    settings: &Settings,
    round: &Round,
    user_id: &UserId,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<Option<SubmissionOutcome>> {
    let mut session = Session::new(round.clone());
    let mut events = Vec::new();
    show(round, out)?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_input(&line) {
            Ok(Input::Play(command)) => command,
            Ok(Input::Show) => {
                let robots = query::robots(&session);
                write!(out, "{}", render::board(round.board(), robots, round.target()))?;
                writeln!(out, "{}", render::legend(robots, round.target()))?;
                continue;
            }
            Ok(Input::Quit) => return Ok(None),
            Err(error) => {
                writeln!(out, "{error}")?;
                continue;
            }
        };

        events.clear();
        world::apply(&mut session, command, &mut events);
        for event in &events {
            writeln!(out, "{}", describe(event))?;
        }

        if query::is_solved(&session) {
            writeln!(out, "solution: {}", format_moves(query::moves(&session)))?;
            if !query::can_save(&session) {
                writeln!(out, "solution is too long to be saved")?;
                return Ok(None);
            }
            let moves = query::moves(&session).to_vec();
            return solve(backend, settings, round, user_id, &moves, out).map(Some);
        }
    }
    Ok(None)
}

/// Deletes a stored round generated by `user_id`.
pub(crate) fn delete_round(
    backend: &MemoryBackend,
    round_id: &RoundId,
    user_id: &UserId,
    out: &mut impl Write,
) -> Result<()> {
    backend
        .rounds()
        .delete(round_id, user_id)
        .with_context(|| format!("failed to delete round {round_id}"))?;
    writeln!(out, "deleted round {round_id}")?;
    Ok(())
}

/// Stores the username shown for `identity` on leaderboards.
pub(crate) fn rename(
    backend: &MemoryBackend,
    identity: &Identity,
    username: &str,
    out: &mut impl Write,
) -> Result<()> {
    let username = Username::parse(username)?;
    let profile = backend
        .profiles()
        .set_username(identity, username, Utc::now())?;
    writeln!(
        out,
        "{} is now shown as {}",
        profile.identity.user_id,
        profile.identity.display_name()
    )?;
    Ok(())
}

/// Prints the global medal table, optionally one round's ranking, and the
/// summary of `viewer`.
pub(crate) fn leaderboard(
    backend: &MemoryBackend,
    round_id: Option<&RoundId>,
    viewer: &UserId,
    out: &mut impl Write,
) -> Result<()> {
    let snapshot = backend.snapshot();
    let names: BTreeMap<UserId, String> = snapshot
        .profiles
        .iter()
        .map(|profile| {
            (
                profile.identity.user_id.clone(),
                profile.identity.display_name().to_owned(),
            )
        })
        .collect();
    let name = |user_id: &UserId| {
        names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    };

    if let Some(round_id) = round_id {
        let scores: Vec<_> = snapshot
            .scores
            .iter()
            .filter(|score| &score.round_id == round_id)
            .cloned()
            .collect();
        writeln!(out, "round {round_id}")?;
        for ranked in rank_scores(&scores) {
            let medal = ranked
                .medal
                .map_or_else(String::new, |medal| format!(" {medal:?}"));
            writeln!(
                out,
                "  {:>2}. {:<20} {:>2} moves{medal}",
                ranked.rank,
                name(&ranked.score.user_id),
                ranked.score.moves
            )?;
        }
    }

    writeln!(out, "leaderboard")?;
    for (position, entry) in global_leaderboard(&snapshot.scores).iter().enumerate() {
        writeln!(
            out,
            "  {:>2}. {:<20} {:>3} pts  gold {} silver {} bronze {}",
            position + 1,
            name(&entry.user_id),
            entry.total_points,
            entry.medals.gold,
            entry.medals.silver,
            entry.medals.bronze
        )?;
    }

    let summary = user_summary(viewer, &snapshot.scores);
    writeln!(
        out,
        "{}: {} pts over {} rounds",
        name(viewer),
        summary.total_points,
        summary.placements.len()
    )?;
    Ok(())
}
