#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating, sharing and playing Ricochet rounds.

mod commands;
mod layout;
mod render;
mod settings;
mod share_code;
mod state;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use log::info;
use ricochet_core::{parse_moves, Identity, RoundId, UserId};

use crate::settings::Settings;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "ricochet", author, version, about, long_about = None)]
struct Cli {
    /// Path to the settings file.
    #[arg(long, default_value = "ricochet.toml")]
    settings: PathBuf,

    /// JSON file that keeps rounds, scores and profiles between runs.
    #[arg(long)]
    state: Option<PathBuf>,

    /// User acting in this invocation.
    #[arg(short, long, default_value = "player")]
    user: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Generate a round and print its share code.
    Generate {
        /// Board layout file with custom walls and target cells.
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Seed for the placement generator; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Draw the round carried by a share code.
    Show {
        /// Share code printed by `generate`.
        code: String,
    },
    /// Play a round interactively, one command per line on stdin.
    Play {
        /// Share code printed by `generate`.
        code: String,
    },
    /// Validate and record a complete solution.
    Solve {
        /// Share code printed by `generate`.
        code: String,
        /// Moves such as "red-up,blue-left".
        #[arg(long)]
        moves: String,
    },
    /// Delete a stored round you generated.
    DeleteRound {
        /// Identifier of the round.
        round: String,
    },
    /// Set the name shown for the current user on leaderboards.
    Rename {
        /// New username.
        username: String,
        /// Contact email stored on the profile.
        #[arg(long)]
        email: Option<String>,
    },
    /// Print the medal leaderboard from the stored scores.
    Leaderboard {
        /// Also rank the scores of this round.
        #[arg(long)]
        round: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = Settings::load(&cli.settings)?;
    let backend = state::load(cli.state.as_deref(), settings.store.clone())?;
    let user_id = UserId::new(cli.user);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        CliCommand::Generate { layout, seed } => {
            let draft = layout.as_deref().map(layout::load).transpose()?;
            let seed = seed.unwrap_or_else(rand::random);
            info!("generating with seed {seed}");
            let round =
                commands::generate(&backend, &settings, draft, &user_id, seed, Utc::now())?;
            commands::show(&round, &mut out)?;
            writeln!(out, "{}", share_code::encode(&round)?)?;
        }
        CliCommand::Show { code } => {
            commands::show(&share_code::decode(&code)?, &mut out)?;
        }
        CliCommand::Play { code } => {
            let round = share_code::decode(&code)?;
            let stdin = io::stdin();
            let _ = commands::play(&backend, &settings, &round, &user_id, stdin.lock(), &mut out)?;
        }
        CliCommand::Solve { code, moves } => {
            let round = share_code::decode(&code)?;
            let moves = parse_moves(&moves).context("invalid move list")?;
            let _ = commands::solve(&backend, &settings, &round, &user_id, &moves, &mut out)?;
        }
        CliCommand::DeleteRound { round } => {
            commands::delete_round(&backend, &RoundId::new(round), &user_id, &mut out)?;
        }
        CliCommand::Rename { username, email } => {
            let identity = Identity {
                user_id: user_id.clone(),
                email,
                username: None,
            };
            commands::rename(&backend, &identity, &username, &mut out)?;
        }
        CliCommand::Leaderboard { round } => {
            let round_id = round.map(RoundId::new);
            commands::leaderboard(&backend, round_id.as_ref(), &user_id, &mut out)?;
        }
    }

    if let Some(path) = &cli.state {
        state::save(path, &backend)?;
    }
    Ok(())
}
