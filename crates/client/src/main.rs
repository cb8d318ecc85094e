use anyhow::Result;
use clap::Parser;
use tracing::debug;

use campus_events_client::config::Config;
use campus_events_client::error::ClientError;
use campus_events_client::logging::init_logging;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    let config = Config::load()?;
    init_logging(&config.logging);
    debug!(
        base_url = %config.api.base_url,
        version = env!("CARGO_PKG_VERSION"),
        "Configuration loaded"
    );

    if let Err(err) = cli::run(args, config).await {
        if let Some(client_err) = err.downcast_ref::<ClientError>() {
            eprintln!("{}", client_err.user_message());
            if client_err.is_unauthorized() {
                eprintln!("Log in with `campus-events login` and set CE__SESSION__TOKEN.");
            } else if client_err.is_retryable() {
                eprintln!("This looks temporary; try again.");
            }
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
