//! Fetch a Lichess game and render it with `chess-core`.

pub mod cli;
pub mod clients;
pub mod config;

use anyhow::Context;
use chess_core::{parse_game, render_report, RecordError};

use crate::clients::lichess::{FetchError, LichessClient};

pub const EXIT_FETCH_FAILED: u8 = 2;
pub const EXIT_MALFORMED_RECORD: u8 = 3;
pub const EXIT_ILLEGAL_MOVE: u8 = 4;
/// Rejected command line (sysexits `EX_USAGE`).
pub const EXIT_USAGE: u8 = 64;

/// Fetch, parse and render one game. Nothing is printed here, so a failure
/// never leaves a partial report behind.
pub async fn export_game(client: &LichessClient, game_id: &str) -> anyhow::Result<String> {
    let raw = client
        .fetch_game(game_id)
        .await
        .with_context(|| format!("could not fetch game {game_id}"))?;
    let game = parse_game(&raw).with_context(|| format!("could not read game {game_id}"))?;
    tracing::info!(
        game_id,
        plies = game.ply_count(),
        analysis = game.has_analysis,
        "Rendering report"
    );
    let report = render_report(&game).with_context(|| format!("could not replay game {game_id}"))?;
    Ok(report)
}

/// Process exit code for a failed export.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<FetchError>().is_some() {
        return EXIT_FETCH_FAILED;
    }
    match err.downcast_ref::<RecordError>() {
        Some(RecordError::Malformed(_)) => EXIT_MALFORMED_RECORD,
        Some(RecordError::IllegalMove { .. }) => EXIT_ILLEGAL_MOVE,
        None => 1,
    }
}
