use clap::error::ErrorKind;
use clap::Parser;

use crate::EXIT_USAGE;

#[derive(Parser, Debug)]
#[command(name = "game-exporter")]
#[command(about = "Export a Lichess game as a human-readable report", long_about = None)]
pub struct Cli {
    /// Lichess game ID, e.g. q7ZvsdUF
    pub game_id: Option<String>,
}

/// Exit code after clap rejected the command line. Help output is a success.
pub fn argument_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_USAGE,
    }
}
