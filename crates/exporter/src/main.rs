//! `game-exporter <GAME_ID>`: print a Lichess game as a text report.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lichess_exporter::cli::{argument_exit_code, Cli};
use lichess_exporter::clients::lichess::LichessClient;
use lichess_exporter::config::ExporterConfig;
use lichess_exporter::{exit_code, export_game, EXIT_FETCH_FAILED};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(argument_exit_code(&e));
        }
    };
    let Some(game_id) = cli.game_id else {
        println!("Please supply the Lichess game ID as argument.");
        return ExitCode::SUCCESS;
    };

    let config = ExporterConfig::default();
    let client = match LichessClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::from(EXIT_FETCH_FAILED);
        }
    };

    match export_game(&client, &game_id).await {
        Ok(report) => {
            println!();
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Export failed");
            eprintln!("ERROR: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
