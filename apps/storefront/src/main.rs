//! # `metiz` Entry Point
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Parse the command line
//! 3. Load config and restore the saved session
//! 4. Run the subcommand

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use metiz_storefront::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    metiz_storefront::init_tracing();

    let cli = Cli::parse();
    match cli.run().await {
        Ok(code) => code,
        Err(err) => {
            error!(code = ?err.code, "Command failed");
            eprintln!("{}", err.message);
            ExitCode::FAILURE
        }
    }
}
