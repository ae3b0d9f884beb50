//! CLI entry point for the turnstile server.
//!
//! # Usage
//!
//! ```bash
//! # Listen on the default port (12345)
//! turnstile
//!
//! # Listen on a specific port
//! turnstile 9090
//!
//! # Enable debug logging
//! RUST_LOG=turnstile=debug turnstile 9090
//! ```
//!
//! # Signal handling
//!
//! - SIGTERM: Graceful shutdown, exit code 0
//! - SIGHUP: Logged, the server keeps running

use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;
use turnstile::{Server, resolve_port};

/// Single-client TCP server driven by an epoll reactor.
#[derive(Parser, Debug)]
#[command(name = "turnstile", version, about)]
struct Args {
    /// TCP port to listen on (1-65535); missing or invalid values fall
    /// back to the default port
    port: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "turnstile=info".into()),
        )
        .init();

    let args = Args::parse();
    let port = resolve_port(args.port.as_deref());

    let mut server = match Server::bind(port) {
        Ok(server) => server,
        Err(error) => {
            error!(%error, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    match server.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "server loop failed");
            ExitCode::FAILURE
        }
    }
}
