//! Beacon server binary.
//!
//! # Usage
//!
//! ```bash
//! # Relay only
//! beacon-server --bind 0.0.0.0:8000
//!
//! # Relay plus the demo page
//! beacon-server --bind 0.0.0.0:8000 --static-dir crates/beacon-server/static
//! ```

use std::path::PathBuf;

use beacon_server::{Server, ServerConfig};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Room-scoped signaling relay for peer-to-peer bootstrap
#[derive(Parser, Debug)]
#[command(name = "beacon-server")]
#[command(about = "Room-scoped signaling relay for peer-to-peer bootstrap")]
#[command(version)]
struct Args {
    /// Address to bind to
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Directory with index.html and static assets for the demo page
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    tracing::info!("Beacon server starting");
    tracing::info!("Binding to {}", args.bind);

    if args.static_dir.is_none() {
        tracing::info!("No static directory configured - serving the relay endpoint only");
    }

    let config = ServerConfig { bind_address: args.bind, static_dir: args.static_dir };

    let server = Server::bind(config).await?;

    tracing::info!("Server listening on {}", server.local_addr()?);

    server.run().await?;

    Ok(())
}
