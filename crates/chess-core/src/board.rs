//! Replay a game through shakmaty and draw the resulting position.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{
    Board, CastlingMode, Chess, Color, EnPassantMode, File, Piece, Position, Rank, Role, Square,
};
use url::form_urlencoded;

use crate::error::{RecordError, Result};

pub const BOARD_IMAGE_URL: &str = "https://lichess.org/export/fen.gif";

/// Position reached after replaying a move list.
pub struct FinalPosition {
    pub position: Chess,
    /// Last move in UCI notation, `None` when no move was played.
    pub last_move: Option<String>,
}

impl FinalPosition {
    /// Piece placement field of the FEN.
    pub fn placement(&self) -> String {
        let fen = Fen::from_position(&self.position, EnPassantMode::Legal).to_string();
        fen.split_whitespace().next().unwrap_or_default().to_string()
    }

    pub fn image_url(&self) -> String {
        board_image_url(&self.placement(), self.last_move.as_deref())
    }

    pub fn diagram(&self) -> String {
        diagram(self.position.board())
    }
}

/// Play every SAN move from the standard starting position.
pub fn replay<'a>(moves: impl IntoIterator<Item = &'a str>) -> Result<FinalPosition> {
    let mut pos = Chess::default();
    let mut last_move = None;

    for (ply, san_str) in moves.into_iter().enumerate() {
        let illegal = |reason: String| RecordError::IllegalMove {
            ply,
            san: san_str.to_string(),
            reason,
        };
        let san: San = san_str.parse().map_err(|e| illegal(format!("{e}")))?;
        let mv = san.to_move(&pos).map_err(|e| illegal(format!("{e}")))?;

        last_move = Some(mv.to_uci(CastlingMode::Standard).to_string());
        pos.play_unchecked(mv);
    }

    Ok(FinalPosition {
        position: pos,
        last_move,
    })
}

pub fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

/// Eight rows from rank 8 down to rank 1, with the colour legend beside
/// the two middle rows.
pub fn diagram(board: &Board) -> String {
    let mut rows: Vec<String> = (0..8u32)
        .rev()
        .map(|rank| {
            (0..8u32)
                .map(|file| {
                    let sq = Square::from_coords(File::new(file), Rank::new(rank));
                    board.piece_at(sq).map_or('.', glyph).to_string()
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    let pawn = |color| glyph(Piece { color, role: Role::Pawn });
    rows[3].push_str(&format!("   {}: white", pawn(Color::White)));
    rows[4].push_str(&format!("   {}: black", pawn(Color::Black)));
    rows.join("\n")
}

pub fn board_image_url(placement: &str, last_move: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("fen", placement);
    if let Some(uci) = last_move {
        query.append_pair("lastMove", uci);
    }
    format!("{BOARD_IMAGE_URL}?{}", query.finish())
}
