//! Plain-text game report.

use std::fmt::Display;

use tracing::debug;

use crate::board::replay;
use crate::error::Result;
use crate::game_data::{GameRecord, MoveRecord, PhaseStart, Side};

pub const HOST_LABEL: &str = "LICHESS.ORG";
pub const GAME_URL_BASE: &str = "https://lichess.org";

/// Render the full report. The board replay is the only step that can fail.
pub fn render_report(game: &GameRecord) -> Result<String> {
    let mut out = String::new();

    out.push_str(&header_line(game));
    out.push('\n');
    out.push_str(&player_block(game));
    out.push('\n');
    out.push_str(&format!(
        "Opening: [{}] {}\n\n",
        game.opening.eco, game.opening.name
    ));

    for row in move_table(game) {
        out.push_str(&row);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("*** {} ***\n", result_line(game)));
    out.push('\n');
    for line in phase_lines(game) {
        out.push_str(&line);
        out.push('\n');
    }

    let fin = replay(game.plies().map(|mv| mv.san.as_str()))?;
    debug!(placement = %fin.placement(), "Replayed final position");
    out.push_str("\nFinal position:\n");
    out.push_str(&fin.diagram());
    out.push_str(&format!("   GIF: {}\n", fin.image_url()));
    out.push('\n');

    out.push_str(&format!("Game URL: {}\n", game_url(&game.id)));
    out.push('\n');

    Ok(out)
}

pub fn header_line(game: &GameRecord) -> String {
    let rated = if game.rated { "RATED" } else { "NOT RATED" };
    format!(
        "{HOST_LABEL} · {} · {} · {rated}\n",
        game.clock.time_control(),
        game.speed.to_uppercase()
    )
}

fn player_block(game: &GameRecord) -> String {
    let (white, black) = (&game.white, &game.black);
    let label = |side: Side| {
        let player = game.player(side);
        format!("{} ({})", player.short_name(), player.rating)
    };

    let mut out = format!(
        "WHITE: {:<32} BLACK: {}\n",
        label(Side::White),
        label(Side::Black)
    );
    out.push_str(&row("Score", &game.score(Side::White), &game.score(Side::Black)));
    out.push_str(&row("Rating change", &white.rating_diff, &black.rating_diff));

    match (white.analysis, black.analysis) {
        (Some(w), Some(b)) if game.has_analysis => {
            out.push_str(&row("Inaccuracies", &w.inaccuracy, &b.inaccuracy));
            out.push_str(&row("Mistakes", &w.mistake, &b.mistake));
            out.push_str(&row("Blunders", &w.blunder, &b.blunder));
            out.push_str(&row("AvgLostCentiPawns", &w.acpl, &b.acpl));
        }
        _ => out.push_str("\nThis game has not been analyzed, so analysis data is unavailable.\n"),
    }
    out
}

fn row(name: &str, white: &dyn Display, black: &dyn Display) -> String {
    format!("  {name:.<19}: {:<3}                {name:.<19}: {black}\n", white.to_string())
}

/// One row per move pair: number, decorated moves, clocks, and when the
/// game is analyzed, evaluations and judgment comments.
pub fn move_table(game: &GameRecord) -> Vec<String> {
    game.moves
        .iter()
        .enumerate()
        .map(|(idx, pair)| {
            let black = pair.black.as_ref();
            let black_san = black.map(MoveRecord::decorated).unwrap_or_default();
            let white_clock = pair.white.clock_display();
            let black_clock = black
                .map(MoveRecord::clock_display)
                .unwrap_or_else(|| " ".repeat(white_clock.chars().count()));

            let mut row = format!(
                "{:>3}. {:<8} {:<8}   {white_clock}   {black_clock}",
                idx + 1,
                pair.white.decorated(),
                black_san
            );

            if game.has_analysis {
                let black_eval = black.map(MoveRecord::evaluation_display).unwrap_or_default();
                row.push_str(&format!(
                    "   {:<6}  {:<6}",
                    eval_cell(&pair.white.evaluation_display()),
                    eval_cell(&black_eval)
                ));
                for (side, mv) in [(Side::White, Some(&pair.white)), (Side::Black, black)] {
                    if let Some(judgment) = mv.and_then(MoveRecord::judgment) {
                        row.push_str(&format!("   {}: {}", capitalize(side.name()), judgment.comment));
                    }
                }
            }
            row.trim_end().to_string()
        })
        .collect()
}

/// Non-negative evaluations and mates get a leading space so the digits
/// line up with negative values.
fn eval_cell(eval: &str) -> String {
    if eval.is_empty() || eval.starts_with('-') {
        eval.to_string()
    } else {
        format!(" {eval}")
    }
}

/// "White wins: black resigned" or "The game ended with a Draw".
pub fn result_line(game: &GameRecord) -> String {
    match game.winner {
        Some(winner) => format!(
            "{} wins: {} {}",
            capitalize(winner.name()),
            winner.opponent().name(),
            terminal_reason(&game.status)
        ),
        None => format!("The game ended with a {}", capitalize(&game.status)),
    }
}

pub fn terminal_reason(status: &str) -> &'static str {
    match status {
        "draw" => "draw",
        "stalemate" => "stalemate",
        "mate" => "was checkmated",
        "resign" => "resigned",
        "outoftime" => "ran out of time",
        _ => "ended unexpectedly",
    }
}

pub fn phase_lines(game: &GameRecord) -> Vec<String> {
    [("Middlegame", game.division.middle), ("Endgame", game.division.end)]
        .into_iter()
        .filter_map(|(phase, ply)| {
            let start = PhaseStart::from_ply(ply?);
            Some(format!(
                "{phase} started at move {} ({})",
                start.move_number,
                start.side.name()
            ))
        })
        .collect()
}

pub fn game_url(id: &str) -> String {
    format!("{GAME_URL_BASE}/{id}")
}

/// First letter upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
