//! Keygate server
//!
//! Exchanges product keys for signed tokens and answers token checks over
//! HTTP:
//! 1. `POST /api/validate-key` issues a token for a product key
//! 2. `POST /api/validate-token` checks a token
//! 3. `POST /api/get-user` returns the user bound to a token
//!
//! Usage:
//!   KEYGATE_SECRET=... keygate-server --port 5000
//!
//! The server keeps no per-request state.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use keygate_license::{LicenseGate, StaticKeyDirectory, TokenService};
use keygate_server::build_router;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "keygate-server")]
#[command(about = "Product key token server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Address to bind
    #[arg(long, env = "KEYGATE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Token signing secret
    #[arg(long, env = "KEYGATE_SECRET", hide_env_values = true)]
    secret: String,

    /// JSON product key table; the builtin table is used when omitted
    #[arg(short, long, env = "KEYGATE_KEYS_FILE")]
    keys_file: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Keygate starting...");

    let directory = match &args.keys_file {
        Some(path) => {
            info!("Loading product keys from {:?}", path);
            StaticKeyDirectory::from_json_file(path)
                .with_context(|| format!("Failed to load key table {}", path.display()))?
        }
        None => StaticKeyDirectory::builtin(),
    };
    info!("{} product keys loaded", directory.len());

    let tokens = TokenService::new(&args.secret).context("Invalid signing secret")?;
    let gate = LicenseGate::new(Arc::new(directory), tokens);
    let app = build_router(gate);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Keygate stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
