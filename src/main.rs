use anyhow::Result;
use clap::Parser;
use log::error;

use scrive::{Cli, CommandHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - only show errors unless RUST_LOG overrides
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Error)
        .init();

    let cli = Cli::parse();

    let mut handler = match CommandHandler::new() {
        Ok(handler) => handler,
        Err(e) => {
            error!("Failed to initialize scrive: {e}");
            eprintln!("Error: Failed to initialize scrive: {e}");
            std::process::exit(1);
        }
    };

    match handler.handle_command(cli.command).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("Command failed: {e}");
            eprintln!("{}", handler.format_error(&e.to_string()));
            std::process::exit(1);
        }
    }

    Ok(())
}
