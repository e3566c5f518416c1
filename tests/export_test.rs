//! End-to-end tests: raw Lichess export JSON through the parser and the
//! report renderer.

use chess_core::board::replay;
use chess_core::game_data::Side;
use chess_core::report::move_table;
use chess_core::{parse_game, render_report, RecordError};
use serde_json::{json, Value};

fn export(moves: &str, clocks: &[i64]) -> Value {
    json!({
        "id": "q7ZvsdUF",
        "rated": true,
        "variant": "standard",
        "speed": "blitz",
        "createdAt": 1_700_000_000_000_i64,
        "lastMoveAt": 1_700_000_300_000_i64,
        "status": "draw",
        "players": {
            "white": {
                "user": { "name": "WhitePlayerWithAVeryLongName", "id": "whiteplayer" },
                "rating": 1843,
                "ratingDiff": 0
            },
            "black": {
                "user": { "name": "blackbird", "id": "blackbird" },
                "rating": 1790,
                "ratingDiff": 0
            }
        },
        "opening": { "eco": "B00", "name": "King's Pawn", "ply": 1 },
        "moves": moves,
        "clocks": clocks,
        "clock": { "initial": 180, "increment": 2, "totalTime": 260 }
    })
}

fn lines_starting_with<'a>(report: &'a str, prefix: &str) -> Vec<&'a str> {
    report.lines().filter(|l| l.starts_with(prefix)).collect()
}

#[test]
fn test_single_ply_draw() {
    let game = parse_game(&export("e4", &[18_000])).unwrap();
    let report = render_report(&game).unwrap();

    assert!(report.starts_with("LICHESS.ORG · 3+2 · BLITZ · RATED\n"));
    assert!(report.contains("*** The game ended with a Draw ***"));
    assert!(report.contains("WHITE: WhitePlayerWithAVeryLongN (1843)"));
    assert_eq!(lines_starting_with(&report, "  Score..............: ½").len(), 1);

    let rows = move_table(&game);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], "  1. e4                  03:00.0");
    assert_eq!(lines_starting_with(&report, "  1. ").len(), 1);
    assert!(lines_starting_with(&report, "  2. ").is_empty());

    assert!(report.contains(". . . . ♙ . . .   ♟: black"));
    assert!(report.contains(
        "fen=rnbqkbnr%2Fpppppppp%2F8%2F8%2F4P3%2F8%2FPPPP1PPP%2FRNBQKBNR&lastMove=e2e4"
    ));
    assert!(report.trim_end().ends_with("Game URL: https://lichess.org/q7ZvsdUF"));
}

#[test]
fn test_blunder_is_decorated_and_attributed() {
    let mut raw = export("e4 e5 Bc4 Nc6 Qh5 Nf6 Qxf7#", &[18_000, 18_000, 17_800, 17_500, 17_600, 17_000, 17_700]);
    raw["status"] = json!("mate");
    raw["winner"] = json!("white");
    raw["players"]["white"]["analysis"] = json!({ "inaccuracy": 0, "mistake": 0, "blunder": 0, "acpl": 12 });
    raw["players"]["black"]["analysis"] = json!({ "inaccuracy": 0, "mistake": 0, "blunder": 1, "acpl": 310 });
    raw["analysis"] = json!([
        { "eval": 30 },
        { "eval": 25 },
        { "eval": 20 },
        { "eval": 30 },
        { "eval": 10 },
        {
            "mate": 1,
            "best": "g7g6",
            "variation": "g6 Qf3 Nf6",
            "judgment": { "name": "Blunder", "comment": "Checkmate is now unavoidable. g6 was best." }
        }
    ]);

    let game = parse_game(&raw).unwrap();
    assert!(game.has_analysis);
    let report = render_report(&game).unwrap();

    let row = move_table(&game)
        .into_iter()
        .find(|r| r.starts_with("  3. "))
        .unwrap();
    assert!(row.contains("Nf6?? "), "row was {row:?}");
    assert!(row.ends_with("Black: Checkmate is now unavoidable. g6 was best."));
    assert!(!row.contains("White: "));

    assert!(report.contains("*** White wins: black was checkmated ***"));
    assert!(report.contains("  Blunders...........: 0                  Blunders...........: 1"));
    assert!(report.contains("  AvgLostCentiPawns..: 12                 AvgLostCentiPawns..: 310"));
    assert!(!report.contains("has not been analyzed"));
}

#[test]
fn test_null_judgment_leaves_no_comment() {
    let mut raw = export("e4", &[18_000]);
    raw["analysis"] = json!([{ "eval": 20, "judgment": null }]);
    let game = parse_game(&raw).unwrap();

    let rows = move_table(&game);
    assert_eq!(rows[0], format!("  1. e4                  03:00.0{}0.2", " ".repeat(14)));
    assert!(!rows[0].contains("White:"));
}

#[test]
fn test_black_wins_by_resignation() {
    let mut raw = export("f3 e5 g4", &[18_000, 18_000, 17_900]);
    raw["status"] = json!("resign");
    raw["winner"] = json!("black");
    raw["players"]["white"]["ratingDiff"] = json!(-6);
    raw["players"]["black"]["ratingDiff"] = json!(6);

    let game = parse_game(&raw).unwrap();
    assert_eq!(game.winner, Some(Side::Black));
    let report = render_report(&game).unwrap();

    assert!(report.contains("*** Black wins: white resigned ***"));
    assert!(report.contains("  Score..............: 0                  Score..............: 1"));
    assert!(report.contains("  Rating change......: -6                 Rating change......: 6"));
}

#[test]
fn test_unknown_status_does_not_fail() {
    let mut raw = export("e4 e5", &[18_000, 18_000]);
    raw["status"] = json!("cheat");
    raw["winner"] = json!("white");
    let report = render_report(&parse_game(&raw).unwrap()).unwrap();
    assert!(report.contains("White wins: black ended unexpectedly"));
}

#[test]
fn test_phase_boundaries_in_report() {
    let mut raw = export("e4 e5", &[18_000, 18_000]);
    raw["division"] = json!({ "middle": 0, "end": 1 });
    let report = render_report(&parse_game(&raw).unwrap()).unwrap();
    assert!(report.contains("Middlegame started at move 1 (white)\n"));
    assert!(report.contains("Endgame started at move 1 (black)\n"));
}

#[test]
fn test_parsed_games_replay_cleanly() {
    let games = [
        "",
        "e4",
        "d4 d5 c4 e6 Nc3 Nf6 Bg5 Be7 e3 O-O Nf3 Nbd7",
        "e4 d5 e5 f5 exf6 g6 f7+ Kd7 fxg8=Q Rxg8 Nf3 Kc6",
        "e4 e5 Nf3 Nc6 Bc4 Bc5 O-O Nf6 d3 O-O",
    ];
    for moves in games {
        let plies = moves.split_whitespace().count();
        let clocks: Vec<i64> = (0..plies as i64).map(|i| 18_000 - i * 50).collect();
        let game = parse_game(&export(moves, &clocks)).unwrap();
        let fin = replay(game.plies().map(|m| m.san.as_str()))
            .unwrap_or_else(|e| panic!("{moves}: {e}"));
        assert_eq!(fin.last_move.is_some(), plies > 0);
        render_report(&game).unwrap();
    }

    let promoted = parse_game(&export(
        "e4 d5 e5 f5 exf6 g6 f7+ Kd7 fxg8=Q Rxg8 Nf3 Kc6",
        &[18_000; 12],
    ))
    .unwrap();
    let fin = replay(promoted.plies().map(|m| m.san.as_str())).unwrap();
    assert_eq!(fin.last_move.as_deref(), Some("d7c6"));
}

#[test]
fn test_truncated_clocks_fail_closed() {
    let err = parse_game(&export("e4 e5 Nf3", &[18_000, 18_000])).unwrap_err();
    assert!(matches!(err, RecordError::Malformed(_)));
}

#[test]
fn test_corrupt_move_list_is_illegal_move() {
    let game = parse_game(&export("e4 Ke2", &[18_000, 18_000])).unwrap();
    let err = render_report(&game).unwrap_err();
    assert!(matches!(err, RecordError::IllegalMove { ply: 1, .. }));
}
