//! Lichess game export to a readable text report.
//!
//! [`parse::parse_game`] builds the typed model from the raw JSON export and
//! [`report::render_report`] turns it into text.

pub mod board;
pub mod error;
pub mod game_data;
pub mod parse;
pub mod report;

pub use error::RecordError;
pub use game_data::GameRecord;
pub use parse::parse_game;
pub use report::render_report;
