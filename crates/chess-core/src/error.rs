//! Errors raised while turning a raw game record into a report.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    /// Mandatory structure is missing or cannot support a report.
    #[error("Malformed game record: {0}")]
    Malformed(String),

    /// The rules engine rejected a move while replaying the game.
    #[error("Illegal move '{san}' at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, RecordError>;
