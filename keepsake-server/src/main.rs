//! Keepsake server binary

use clap::Parser;
use tracing::{error, info};

use keepsake_server::{config::Args, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!(
        listen = %args.listen_addr(),
        require_store = args.require_store,
        "starting keepsake server"
    );

    server::run(args).await
}
