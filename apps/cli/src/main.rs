//! # Ohana Entry Point
//!
//! ```text
//! $ ohana login admin1 --password admin1
//! $ ohana ticket create -n "María Gómez" -p "11 4444-1234" -v 2 --payment cash
//! $ ohana dashboard --timeframe weekly
//! ```
//!
//! Results are printed as pretty JSON on stdout. Failures print a
//! `{"code", "message"}` object on stderr and exit non-zero.

use clap::Parser;
use ohana_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    ohana_cli::init_tracing();

    match ohana_cli::run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to render output: {}", e);
                std::process::exit(1);
            }
        },
        Err(err) => {
            let text = serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", text);
            std::process::exit(err.code.exit_code());
        }
    }
}
