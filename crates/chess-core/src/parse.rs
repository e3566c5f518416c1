//! Turn a raw Lichess game export (JSON) into a [`GameRecord`].
//!
//! The export is loosely typed: most fields are optional and fall back to
//! defaults. Only the players block, the move list and a clock list covering
//! every move are required.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RecordError, Result};
use crate::game_data::{
    AnalysisSummary, ClockConfig, GameRecord, Identity, Judgment, MoveAnnotation, MovePair,
    MoveRecord, OpeningInfo, PhaseBoundaries, PlayerRecord, Severity, Side,
};

/// Parse a game export into the typed model.
pub fn parse_game(raw: &Value) -> Result<GameRecord> {
    let has_analysis = has_analysis(raw);

    let players = raw
        .get("players")
        .filter(|p| p.is_object())
        .ok_or_else(|| RecordError::Malformed("missing players block".into()))?;
    let white = parse_player(players, Side::White, has_analysis)?;
    let black = parse_player(players, Side::Black, has_analysis)?;

    let sans = move_list(raw)?;
    let clocks = clock_samples(raw)?;
    if clocks.len() < sans.len() {
        return Err(RecordError::Malformed(format!(
            "{} clock samples for {} moves",
            clocks.len(),
            sans.len()
        )));
    }

    let analyses: &[Value] = if has_analysis {
        raw.get("analysis")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    } else {
        &[]
    };

    let plies: Vec<MoveRecord> = sans
        .into_iter()
        .enumerate()
        .map(|(idx, san)| MoveRecord {
            san,
            clock: clocks[idx],
            thinking_time: thinking_time(&clocks, idx),
            annotation: analyses.get(idx).and_then(parse_annotation),
        })
        .collect();
    debug!(
        plies = plies.len(),
        annotated = plies.iter().filter(|m| m.annotation.is_some()).count(),
        "Parsed move list"
    );

    Ok(GameRecord {
        id: str_or(raw, "id", "N/A"),
        variant: variant(raw),
        speed: str_or(raw, "speed", "N/A"),
        created_at: raw.get("createdAt").and_then(Value::as_i64).unwrap_or(-1),
        last_move_at: raw.get("lastMoveAt").and_then(Value::as_i64).unwrap_or(-1),
        status: status(raw),
        rated: raw.get("rated").and_then(Value::as_bool).unwrap_or(true),
        white,
        black,
        winner: winner(raw),
        moves: pair_plies(plies),
        clock: clock_config(raw),
        division: phase_boundaries(raw),
        opening: opening(raw),
        has_analysis,
    })
}

/// Analysis exists when the export carries an `analysis` entry at the top
/// level or under either player. Move and comment text is never searched.
pub fn has_analysis(raw: &Value) -> bool {
    if raw.get("analysis").is_some() {
        return true;
    }
    ["white", "black"].iter().any(|side| {
        raw.get("players")
            .and_then(|players| players.get(side))
            .and_then(|player| player.get("analysis"))
            .is_some()
    })
}

/// Centiseconds spent on ply `idx`, measured against the same side's
/// previous clock sample. The first move of each side counts as zero.
pub fn thinking_time(clocks: &[i64], idx: usize) -> i64 {
    if idx >= 2 {
        clocks[idx - 2] - clocks[idx]
    } else {
        0
    }
}

/// Pair plies as (white, black); an odd trailing ply pairs with `None`.
pub fn pair_plies(plies: Vec<MoveRecord>) -> Vec<MovePair> {
    let mut pairs = Vec::with_capacity(plies.len().div_ceil(2));
    let mut plies = plies.into_iter();
    while let Some(white) = plies.next() {
        pairs.push(MovePair {
            white,
            black: plies.next(),
        });
    }
    pairs
}

fn parse_player(players: &Value, side: Side, has_analysis: bool) -> Result<PlayerRecord> {
    let player = players
        .get(side.name())
        .filter(|p| p.is_object())
        .ok_or_else(|| RecordError::Malformed(format!("missing {} player", side.name())))?;

    let analysis = has_analysis.then(|| {
        let counters = player.get("analysis");
        let counter = |key: &str| {
            counters
                .and_then(|c| c.get(key))
                .and_then(as_i32)
                .unwrap_or(-1)
        };
        AnalysisSummary {
            inaccuracy: counter("inaccuracy"),
            mistake: counter("mistake"),
            blunder: counter("blunder"),
            acpl: counter("acpl"),
        }
    });

    Ok(PlayerRecord {
        color: side,
        user: identity(player),
        rating: player.get("rating").and_then(as_i32).unwrap_or(-1),
        rating_diff: player.get("ratingDiff").and_then(as_i32).unwrap_or(0),
        analysis,
    })
}

fn identity(player: &Value) -> Identity {
    if let Some(user) = player.get("user") {
        return Identity {
            name: str_or(user, "name", "Anonymous"),
            id: str_or(user, "id", ""),
        };
    }
    // Engine opponents carry an AI level instead of a user.
    match player.get("aiLevel").and_then(Value::as_i64) {
        Some(level) => Identity {
            name: format!("Stockfish level {level}"),
            id: String::new(),
        },
        None => Identity {
            name: "Anonymous".to_string(),
            id: String::new(),
        },
    }
}

fn move_list(raw: &Value) -> Result<Vec<String>> {
    match raw.get("moves") {
        Some(Value::String(moves)) => Ok(moves.split_whitespace().map(String::from).collect()),
        Some(Value::Array(moves)) => moves
            .iter()
            .enumerate()
            .map(|(idx, mv)| {
                mv.as_str().map(String::from).ok_or_else(|| {
                    RecordError::Malformed(format!("move {idx} is not a string: {mv}"))
                })
            })
            .collect(),
        Some(other) => Err(RecordError::Malformed(format!(
            "unexpected moves entry: {other}"
        ))),
        None => Err(RecordError::Malformed("missing moves".into())),
    }
}

fn clock_samples(raw: &Value) -> Result<Vec<i64>> {
    let Some(clocks) = raw.get("clocks").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    clocks
        .iter()
        .enumerate()
        .map(|(idx, sample)| {
            sample.as_i64().ok_or_else(|| {
                RecordError::Malformed(format!("clock sample {idx} is not an integer: {sample}"))
            })
        })
        .collect()
}

fn parse_annotation(entry: &Value) -> Option<MoveAnnotation> {
    let judgment = entry
        .get("judgment")
        .filter(|j| j.is_object())
        .map(|j| Judgment {
            severity: Severity::from_name(j.get("name").and_then(Value::as_str).unwrap_or("")),
            comment: str_or(j, "comment", ""),
        });

    let annotation = MoveAnnotation {
        eval: entry.get("eval").and_then(as_i32),
        mate: entry.get("mate").and_then(as_i32),
        best: entry.get("best").and_then(Value::as_str).map(String::from),
        variation: entry.get("variation").and_then(Value::as_str).map(String::from),
        judgment,
    };
    annotation.is_present().then_some(annotation)
}

fn winner(raw: &Value) -> Option<Side> {
    match raw.get("winner").and_then(Value::as_str) {
        Some("white") => Some(Side::White),
        Some("black") => Some(Side::Black),
        Some(other) => {
            warn!("Unrecognised winner '{other}', treating the game as undecided");
            None
        }
        None => None,
    }
}

// Older exports send the variant and status as objects.
fn variant(raw: &Value) -> String {
    match raw.get("variant") {
        Some(Value::Object(obj)) => obj
            .get("key")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        _ => str_or(raw, "variant", "N/A"),
    }
}

fn status(raw: &Value) -> String {
    match raw.get("status") {
        Some(Value::Object(obj)) => obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        _ => str_or(raw, "status", "N/A"),
    }
}

fn clock_config(raw: &Value) -> ClockConfig {
    let Some(clock) = raw.get("clock") else {
        return ClockConfig::default();
    };
    let field = |key: &str| clock.get(key).and_then(as_i32).unwrap_or(-1);
    ClockConfig {
        initial: field("initial"),
        increment: field("increment"),
        total_time: field("totalTime"),
    }
}

fn phase_boundaries(raw: &Value) -> PhaseBoundaries {
    let division = raw.get("division");
    let ply = |key: &str| {
        division
            .and_then(|d| d.get(key))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    };
    PhaseBoundaries {
        middle: ply("middle"),
        end: ply("end"),
    }
}

fn opening(raw: &Value) -> OpeningInfo {
    let Some(opening) = raw.get("opening") else {
        return OpeningInfo::default();
    };
    OpeningInfo {
        eco: str_or(opening, "eco", ""),
        name: str_or(opening, "name", ""),
        ply: opening
            .get("ply")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0),
    }
}

fn str_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn as_i32(value: &Value) -> Option<i32> {
    value.as_i64().and_then(|v| i32::try_from(v).ok())
}
