#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! # keygate
//!
//! Demo API key service. Issues bearer-style keys, keeps only their Argon2id
//! hashes in memory, and gates every non-management route on a valid
//! `x-api-key` header.
//!
//! ## API surface
//!
//! | Method | Path                  | Auth | Description                     |
//! |--------|-----------------------|------|---------------------------------|
//! | POST   | `/generate-key`       | No   | Issue a key (plaintext shown once) |
//! | GET    | `/keys`               | No   | List keys, masked               |
//! | DELETE | `/keys/{id}`          | No   | Revoke a key                    |
//! | GET    | `/hello`              | Yes  | Protected greeting              |
//! | GET    | `/api/v1/description` | Yes  | Team description                |
//! | GET    | `/api/v1/team`        | Yes  | Team name and members           |
//! | GET    | `/api/v1/teamsize`    | Yes  | Team member count               |
//! | GET    | `/api/v1/images`      | Yes  | Team member images (base64)     |
//!
//! ## Architecture
//!
//! ```text
//! main.rs          — entry point, clap args, tracing, graceful shutdown
//! config.rs        — TOML + env-var configuration
//! state.rs         — AppState (config + key store)
//! auth.rs          — x-api-key gate middleware
//! keys/
//!   mod.rs         — KeyStore (create, list, delete, validate)
//!   hasher.rs      — Argon2id hashing and verification
//! routes/
//!   mod.rs         — router assembly, CORS, tracing layer, 404 fallback
//!   keys.rs        — POST /generate-key, GET /keys, DELETE /keys/{id}
//!   hello.rs       — GET /hello
//!   team.rs        — GET /api/v1/*
//! ```

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use keygate::{AppState, Config};

/// In-memory API key issuance and validation service.
#[derive(Parser)]
#[command(name = "keygate", version)]
struct Cli {
    /// Path to TOML config file.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("keygate: configuration error: {e}");
            std::process::exit(1);
        }
    };

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    info!("keygate v{} starting", env!("CARGO_PKG_VERSION"));

    let listen = config.server.listen_addr();
    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("Cannot initialise key hasher: {e}");
            std::process::exit(1);
        }
    };

    let listener = match TcpListener::bind(&listen).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {listen}: {e}");
            std::process::exit(1);
        }
    };
    info!("API running on {listen}");

    let app = keygate::router(state.clone());
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }

    info!(keys = state.key_store.len(), "Shutting down, discarding in-memory keys");
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received SIGINT"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                error!("Failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                info!("Received SIGINT");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT");
    }
}
